//! `/app/scan` and `/app/product` — barcode resolution.
//!
//! A submitted barcode (camera decode or manual entry) resolves against
//! the product cache. Hits prompt for confirmation straight away; misses
//! return a `fetch_product` effect, and the host feeds the proxy
//! response back through `/app/product`. Every failure becomes an OK
//! feedback item — scanning never errors out of the session.

use crate::catalog::{self, Resolution};
use crate::effects::{Effect, Reply, error_reply};
use crate::error::EngineError;
use crate::feedback::{ConfirmAction, FeedbackItem};
use crate::gamification::sugar;
use crate::routes::log::push_feedback;
use crate::routes::util::{form_params, require};
use crate::session::{Session, with_session_mut};

/// Handle POST /app/scan
/// Body params: `barcode={digits}&today={YYYY-MM-DD}`
pub fn handle_scan_post(body: &str) -> String {
    let params = form_params(body);
    let (barcode, today) = match (require(&params, "barcode"), require(&params, "today")) {
        (Ok(b), Ok(t)) => (b, t),
        (Err(msg), _) | (_, Err(msg)) => return error_reply(&msg),
    };

    with_session_mut(|session| {
        let mut effects = Vec::new();
        match catalog::resolve(&session.products, barcode) {
            Ok(Resolution::Cached(product)) => {
                confirm_prompt(session, barcode, &product, today, &mut effects);
            }
            Ok(Resolution::NeedsFetch { url }) => {
                tracing::debug!(%barcode, "product not cached, fetching");
                effects.push(Effect::FetchProduct {
                    barcode: barcode.to_string(),
                    url,
                });
            }
            Err(err) => feedback_failure(session, &err, &mut effects),
        }
        Reply::effects(effects).to_json()
    })
}

/// Handle POST /app/product
/// Body params: `barcode={digits}&today={YYYY-MM-DD}&ok={true|false}&payload={proxy JSON}`
///
/// `ok` is the transport-level success flag; a failed fetch carries no
/// payload and reports the lookup as unavailable.
pub fn handle_product_post(body: &str) -> String {
    let params = form_params(body);
    let (barcode, today) = match (require(&params, "barcode"), require(&params, "today")) {
        (Ok(b), Ok(t)) => (b, t),
        (Err(msg), _) | (_, Err(msg)) => return error_reply(&msg),
    };
    let transport_ok = params.get("ok").map(String::as_str) != Some("false");

    with_session_mut(|session| {
        let mut effects = Vec::new();
        if !transport_ok {
            let err =
                EngineError::ProductNotFound("Product not found in database.".to_string());
            feedback_failure(session, &err, &mut effects);
            return Reply::effects(effects).to_json();
        }

        let payload = params.get("payload").map(String::as_str).unwrap_or("");
        match catalog::ingest_lookup(&mut session.products, barcode, payload) {
            Ok(product) => confirm_prompt(session, barcode, &product, today, &mut effects),
            Err(err) => feedback_failure(session, &err, &mut effects),
        }
        Reply::effects(effects).to_json()
    })
}

/// Queue the "add this product?" confirmation. The deferred log rides on
/// the item itself.
fn confirm_prompt(
    session: &mut Session,
    barcode: &str,
    product: &catalog::Product,
    today: &str,
    effects: &mut Vec<Effect>,
) {
    let intake = sugar::sugar_intake(product, &session.config);
    let item = FeedbackItem::confirm(
        "Confirm Scan",
        format!(
            "Add '{}'? It contains ~{:.1}g of sugar.",
            product.display_name(),
            intake
        ),
        ConfirmAction::LogProduct {
            barcode: barcode.to_string(),
            today: today.to_string(),
        },
    );
    push_feedback(session, item, effects);
}

/// Surface a resolution failure as an OK notification (or just log it,
/// for the kinds that never reach the user).
fn feedback_failure(session: &mut Session, err: &EngineError, effects: &mut Vec<Effect>) {
    if err.is_user_facing() {
        push_feedback(
            session,
            FeedbackItem::ok(err.feedback_title(), err.to_string()),
            effects,
        );
    } else {
        tracing::warn!(%err, "resolution failure");
    }
}
