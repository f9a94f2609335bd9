//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every form also works as a plain POST: the handler redirects back and the
//! next page shows the updated cart. The cart itself lives in the session
//! (see [`CartStore`]).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header::LOCATION},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use food_en_k_core::CartLineId;
use food_en_k_core::cart::{Cart, CartLine, ProductSnapshot};
use food_en_k_core::order::{OrderAction, OrderContact, execute_order_action};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{HxRequest, PageContext};
use super::newsletter::back_path;
use crate::cms::media;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::cart_store::CartStore;
use crate::services::menu::fetch_product;
use crate::services::notifications::{Notification, Notifications};
use crate::services::seo::SeoData;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub quantity: u32,
    pub quantity_minus: i64,
    pub quantity_plus: i64,
    pub unit_price: String,
    pub line_total: String,
    pub notes: String,
    pub image: Option<String>,
    pub vegetarian: bool,
    pub vegan: bool,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let quantity = i64::from(line.quantity);
        Self {
            id: line.id.to_string(),
            name: line.product.name.clone(),
            slug: line.product.slug.clone(),
            quantity: line.quantity,
            quantity_minus: quantity - 1,
            quantity_plus: quantity + 1,
            unit_price: line.product.unit_price().display(),
            line_total: line.line_total().display(),
            notes: line.notes.clone().unwrap_or_default(),
            image: line.product.image_url.clone(),
            vegetarian: line.product.is_vegetarian,
            vegan: line.product.is_vegan,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total_price().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Outcome of an order action, shown above the order form.
#[derive(Clone)]
pub struct OrderResultView {
    pub success: bool,
    pub message: String,
    pub order_text: Option<String>,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: CartLineId,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: CartLineId,
}

/// Line note form data.
#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub line_id: CartLineId,
    #[serde(default)]
    pub notes: String,
}

/// Order form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub action: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl OrderForm {
    /// Contact block of the message, when the visitor gave a name or phone.
    fn contact(&self) -> Option<OrderContact> {
        let name = self.name.trim();
        let phone = self.phone.trim();
        if name.is_empty() && phone.is_empty() {
            return None;
        }
        Some(OrderContact {
            name: name.to_string(),
            phone: phone.to_string(),
            email: Some(self.email.trim().to_string()).filter(|e| !e.is_empty()),
        })
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
    pub order: Option<OrderResultView>,
    pub form: OrderForm,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
    pub cart_empty: bool,
}

impl CartCountTemplate {
    fn for_cart(cart: &Cart) -> Self {
        let count = cart.item_count();
        Self {
            count,
            cart_empty: count == 0,
        }
    }
}

/// Order result fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_result.html")]
pub struct OrderResultTemplate {
    pub order: OrderResultView,
}

/// Cart items with the `cart-updated` trigger, or a redirect to the cart.
fn items_response(htmx: bool, cart: &Cart) -> Response {
    if htmx {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}

async fn render_page(
    state: &AppState,
    session: &Session,
    nonce: String,
    order: Option<OrderResultView>,
    form: OrderForm,
) -> CartShowTemplate {
    let cart = CartStore::new(session.clone()).load().await;
    let seo_data = SeoData::titled("Mon panier");
    let ctx = PageContext::load(state, session, nonce, "/cart", &seo_data).await;

    CartShowTemplate {
        ctx,
        cart: CartView::from(&cart),
        order,
        form,
    }
}

/// Display cart page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    render_page(&state, &session, nonce, None, OrderForm::default()).await
}

/// Add item to cart.
///
/// The product is looked up by slug so the snapshot carries the current
/// CMS price. Returns the count badge with an HTMX trigger, or redirects
/// back to the page the form was on.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(state, session, headers), fields(slug = %form.slug))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let notifications = Notifications::new(session.clone());
    let back = back_path(&headers, &state.config().base_url);
    let api = state.api(&session);

    let Some(product) = fetch_product(&api, form.slug.trim()).await else {
        notifications
            .push(Notification::error(
                "Produit introuvable",
                "Ce produit n'est plus disponible.",
            ))
            .await;
        return Ok(if htmx {
            StatusCode::NOT_FOUND.into_response()
        } else {
            Redirect::to(&back).into_response()
        });
    };

    if product.is_unavailable() {
        notifications
            .push(Notification::error(
                "Produit indisponible",
                format!("{} n'est pas disponible pour le moment.", product.name),
            ))
            .await;
        return Ok(if htmx {
            StatusCode::CONFLICT.into_response()
        } else {
            Redirect::to(&back).into_response()
        });
    }

    let mut snapshot = ProductSnapshot::from(&product);
    snapshot.image_url = snapshot
        .image_url
        .map(|url| media::resolve_url(state.cms().base_url(), &url));

    let quantity = form.quantity.unwrap_or(1);
    let (cart, line) = CartStore::new(session.clone()).add(snapshot, quantity).await?;

    if line.is_some() {
        add_breadcrumb(
            "cart",
            "Added product",
            Some(&[("product_id", product.id.to_string().as_str())]),
        );
        if !htmx {
            notifications
                .push(Notification::success(
                    "Ajouté au panier",
                    format!("{} a été ajouté à votre panier.", product.name),
                ))
                .await;
        }
    }

    Ok(if htmx {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate::for_cart(&cart),
        )
            .into_response()
    } else {
        Redirect::to(&back).into_response()
    })
}

/// Update cart line quantity. Zero or less removes the line.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    HxRequest(htmx): HxRequest,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let (cart, _) = CartStore::new(session)
        .update_quantity(form.line_id, form.quantity)
        .await?;
    Ok(items_response(htmx, &cart))
}

/// Remove a cart line.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    HxRequest(htmx): HxRequest,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let (cart, _) = CartStore::new(session).remove(form.line_id).await?;
    Ok(items_response(htmx, &cart))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session))]
pub async fn clear(session: Session, HxRequest(htmx): HxRequest) -> Result<Response> {
    let cart = CartStore::new(session).clear().await?;
    Ok(items_response(htmx, &cart))
}

/// Set or clear the note on a line.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session, form))]
pub async fn note(
    session: Session,
    HxRequest(htmx): HxRequest,
    Form(form): Form<NoteForm>,
) -> Result<Response> {
    let notes = Some(form.notes.trim()).filter(|n| !n.is_empty());
    let (cart, _) = CartStore::new(session)
        .set_notes(form.line_id, notes)
        .await?;
    Ok(items_response(htmx, &cart))
}

/// Open or close the cart drawer.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(state, session, headers))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
) -> Result<Response> {
    let open = CartStore::new(session).toggle().await?;
    tracing::debug!(open, "Cart drawer toggled");

    Ok(if htmx {
        (
            AppendHeaders([("HX-Trigger", "cart-toggled")]),
            StatusCode::NO_CONTENT,
        )
            .into_response()
    } else {
        Redirect::to(&back_path(&headers, &state.config().base_url)).into_response()
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = CartStore::new(session).load().await;
    CartCountTemplate::for_cart(&cart)
}

/// Compose the order and run the chosen action.
///
/// `sms` and `call` send the browser to an `sms:` or `tel:` link (through
/// `HX-Redirect` for htmx). `copy` shows the message for the visitor to
/// copy.
#[instrument(skip(state, session, nonce, form), fields(action = %form.action))]
pub async fn order(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    HxRequest(htmx): HxRequest,
    Form(form): Form<OrderForm>,
) -> Response {
    let action = match form.action.parse::<OrderAction>() {
        Ok(action) => action,
        Err(e) => {
            let result = OrderResultView {
                success: false,
                message: e.to_string(),
                order_text: None,
            };
            return if htmx {
                (StatusCode::BAD_REQUEST, OrderResultTemplate { order: result }).into_response()
            } else {
                let page = render_page(&state, &session, nonce, Some(result), form).await;
                (StatusCode::BAD_REQUEST, page).into_response()
            };
        }
    };

    let cart = CartStore::new(session.clone()).load().await;
    let config = state.config().contact.order_config();
    let contact = form.contact();
    let outcome = execute_order_action(
        action,
        &cart,
        contact.as_ref(),
        &config,
        chrono::Local::now().naive_local(),
    );

    if outcome.success {
        add_breadcrumb(
            "order",
            "Order action",
            Some(&[("action", action.to_string().as_str())]),
        );
        tracing::info!(%action, items = cart.item_count(), "Order prepared");
    }

    if let Some(target) = outcome.redirect.as_deref() {
        // The visitor's phone ends up in the link; refuse what cannot be a
        // header rather than panicking in `Redirect::to`.
        let Ok(location) = HeaderValue::from_str(target) else {
            tracing::warn!("Order link is not a valid header value");
            return StatusCode::BAD_REQUEST.into_response();
        };
        return if htmx {
            AppendHeaders([(HeaderName::from_static("hx-redirect"), location)]).into_response()
        } else {
            (StatusCode::SEE_OTHER, [(LOCATION, location)]).into_response()
        };
    }

    let result = OrderResultView {
        success: outcome.success,
        message: outcome.message,
        order_text: outcome.order_text,
    };
    if htmx {
        OrderResultTemplate { order: result }.into_response()
    } else {
        render_page(&state, &session, nonce, Some(result), form)
            .await
            .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use food_en_k_core::ProductId;

    fn snapshot() -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(3),
            name: "Le Breizh".to_string(),
            slug: "le-breizh".to_string(),
            price: "12.50".parse().unwrap(),
            image_url: None,
            category: Some("Burgers".to_string()),
            is_vegetarian: false,
            is_vegan: false,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add_snapshot(snapshot(), 2);
        let view = CartView::from(&cart);

        assert_eq!(view.item_count, 2);
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity_minus, 1);
        assert_eq!(view.lines[0].quantity_plus, 3);
        assert_eq!(view.total, cart.total_price().display());
        assert!(!view.is_empty());
    }

    #[test]
    fn test_cart_count_marks_empty_cart() {
        let empty = CartCountTemplate::for_cart(&Cart::new()).render().unwrap();
        assert!(empty.contains("cart-count--empty"));
        assert!(empty.contains(">0<"));

        let mut cart = Cart::new();
        cart.add_snapshot(snapshot(), 3);
        let filled = CartCountTemplate::for_cart(&cart).render().unwrap();
        assert!(!filled.contains("cart-count--empty"));
        assert!(filled.contains(">3<"));
    }

    #[test]
    fn test_order_contact_requires_name_or_phone() {
        assert!(OrderForm::default().contact().is_none());

        let form = OrderForm {
            action: "sms".to_string(),
            name: " Jeanne ".to_string(),
            phone: String::new(),
            email: "  ".to_string(),
        };
        let contact = form.contact().unwrap();
        assert_eq!(contact.name, "Jeanne");
        assert_eq!(contact.email, None);
    }
}
