//! Presentation rendering for the shared channel.
//!
//! Display labels live here, on the gateway side; the workflow never
//! compares or branches on them.

use crate::domain::listing::{Listing, ListingStatus};
use crate::domain::schema;

/// Display label for a status, as shown in the channel.
pub fn status_label(status: ListingStatus) -> &'static str {
    match status {
        ListingStatus::Unknown => "⚪ Draft",
        ListingStatus::Active => "🟢 Active",
        ListingStatus::Reserved => "🟡 Reserved",
        ListingStatus::Removed => "🔴 Removed",
        ListingStatus::Closed => "✅ Closed",
    }
}

/// Renders a listing as the human-readable channel message body.
///
/// One line per schema field in schema order, then photo count, broker and
/// status. Unset fields render as a dash so the layout stays stable.
pub fn render_listing(listing: &Listing) -> String {
    let mut lines = Vec::with_capacity(schema::ordered().len() + 3);
    lines.push(format!("🏠 Listing #{}", listing.id()));
    for def in schema::ordered() {
        let value = listing.field(def.key);
        let shown = if value.is_empty() { "—" } else { value };
        lines.push(format!("{}: {}", def.key.display_name(), shown));
    }
    lines.push(format!("Photos: {}", listing.photo_count()));
    lines.push(format!("Broker: {}", listing.broker_handle()));
    lines.push(format!("Status: {}", status_label(listing.status())));
    lines.join("\n")
}
