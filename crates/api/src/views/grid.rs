//! Proof cards and cell fragments.
//!
//! A card lays out one proof's cells row by row. Each cell starts as a
//! "Loading..." div that fetches its cell fragment on load; the fragment is
//! either the final `<img>` or a placeholder that re-polls itself.

use proofsheet_core::grid::GridCell;
use proofsheet_core::proof::PROOFS_DIR;
use proofsheet_core::types::ProofId;
use proofsheet_db::models::proof::Proof;

use super::escape;

fn cell_url(proof_id: ProofId, image_id: &str) -> String {
    format!("/proofs/{proof_id}/image/{image_id}")
}

/// Public URL of a cell's image under the `/data` mount.
pub fn image_url(proof_id: ProofId, image_id: &str) -> String {
    format!("/data/{PROOFS_DIR}/{proof_id}/{image_id}.png")
}

fn cell_element_id(proof_id: ProofId, image_id: &str) -> String {
    format!("proof-{proof_id}-img-{image_id}")
}

/// The final image for a ready cell.
pub fn cell_image(proof_id: ProofId, image_id: &str) -> String {
    format!(
        r#"<img src="{src}" alt="Image {image_id}" class="proof-image">"#,
        src = image_url(proof_id, image_id),
    )
}

/// A pending cell that replaces itself with a fresh fragment every
/// `poll_interval_ms`.
pub fn cell_placeholder(proof_id: ProofId, image_id: &str, poll_interval_ms: u64) -> String {
    format!(
        r#"<div class="placeholder" id="{id}" hx-get="{url}" hx-trigger="every {poll_interval_ms}ms" hx-swap="outerHTML"></div>"#,
        id = cell_element_id(proof_id, image_id),
        url = cell_url(proof_id, image_id),
    )
}

fn cell_figure(proof_id: ProofId, cell: &GridCell) -> String {
    let image_id = cell.image_id();
    let element_id = cell_element_id(proof_id, &image_id);
    format!(
        r#"<figure class="cell" id="{element_id}"><div class="placeholder" id="content-{element_id}" hx-get="{url}" hx-trigger="load" hx-swap="outerHTML">Loading...</div><div class="caption">{caption}</div></figure>"#,
        url = cell_url(proof_id, &image_id),
        caption = escape(&cell.caption()),
    )
}

/// One proof: prompt header and its grid of cells.
pub fn proof_card(proof: &Proof, cells: &[GridCell]) -> String {
    let mut rows = String::new();
    for row in cells.chunks(proof.grid_size.max(1) as usize) {
        rows.push_str(r#"<div class="grid-row">"#);
        for cell in row {
            rows.push_str(&cell_figure(proof.id, cell));
        }
        rows.push_str("</div>");
    }

    format!(
        r#"<div class="proof-card" id="proof-{id}"><div class="generation-prompt"><p>{prompt} /{seed}</p><small>{x_param}, {y_param}</small></div><div class="proof-grid" style="--grid-size: {size};">{rows}</div></div>"#,
        id = proof.id,
        prompt = escape(&proof.prompt),
        seed = proof.seed,
        x_param = escape(&proof.x_param),
        y_param = escape(&proof.y_param),
        size = proof.grid_size,
    )
}

/// The container every card is rendered into, newest first.
pub fn proofs_container(cards: &[String]) -> String {
    let body = if cards.is_empty() {
        "<p>No proofs found.</p>".to_string()
    } else {
        cards.concat()
    };
    format!(r#"<div id="proofs-container" class="proofs-grid-container">{body}</div>"#)
}
