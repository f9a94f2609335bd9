//! Photo gallery on the home page.

use food_en_k_core::entity::GalleryImage;

const PHOTOS: [(&str, &str); 6] = [
    ("1568901346375-23c9450c58cd", "Burger classique avec frites"),
    ("1550547660-d9450f859349", "Cheeseburger gourmand"),
    ("1586816001966-79b736744398", "Burger végétarien"),
    ("1594212699903-ec8a3eca50f5", "Double burger au bacon"),
    ("1565299624946-b28f40a0ca4b", "Burger au poulet croustillant"),
    ("1571091718767-18b5b1457add", "Burger BBQ signature"),
];

// TODO: load from a `galleries` collection once it exists in the CMS
#[must_use]
pub fn gallery_images() -> Vec<GalleryImage> {
    PHOTOS
        .iter()
        .zip(1u32..)
        .map(|((photo, alt), id)| GalleryImage {
            id,
            url: format!("https://images.unsplash.com/photo-{photo}?w=640&h=640&fit=crop"),
            alt: (*alt).to_string(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_images() {
        let images = gallery_images();
        assert_eq!(images.len(), 6);
        assert_eq!(images[0].id, 1);
        assert_eq!(images[5].id, 6);
        assert_eq!(
            images[2].url,
            "https://images.unsplash.com/photo-1586816001966-79b736744398?w=640&h=640&fit=crop"
        );
        assert_eq!(images[2].alt, "Burger végétarien");
    }
}
