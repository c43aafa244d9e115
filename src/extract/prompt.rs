//! Fixed instruction prompt for diagram extraction

use crate::schema::CANVAS_EXTENT;

/// Build the instruction prompt sent alongside the diagram image.
///
/// The rules mirror the provider response contract: verbatim label
/// transcription, directed-edge inference from visual connectors, closed
/// type classification, coordinate estimation on the normalized canvas, and
/// a JSON-only reply shaped as a map candidate.
pub fn extraction_instructions() -> String {
    format!(
        r#"You are given a diagram of a regulatory ecosystem. Convert it into a directed graph.

Rules:
1. Transcribe the text of every visible box or label verbatim into a node's "label". Do not translate, summarize, or correct it.
2. For each arrow or connector, emit one directed edge from its origin node to the node it points at. If the connector carries text, put it in the edge's "label"; otherwise omit "label".
3. Classify each node's "type" as exactly one of: "authority", "entity", "judicial", "service", "other". Use "other" only when none of the first four apply.
4. Estimate each node's "position" as x/y coordinates in the range 0 to {extent}, preserving the relative spatial arrangement of the original image.
5. Give every node and edge a short unique "id" (e.g. "n1", "n2", "e1").
6. Choose a concise "name" describing the diagram as a whole.

Reply with exactly one JSON object and nothing else — no prose, no markdown fencing:
{{"name": "...", "nodes": [{{"id": "...", "label": "...", "type": "...", "position": {{"x": 0, "y": 0}}}}], "edges": [{{"id": "...", "source": "...", "target": "...", "label": "..."}}]}}"#,
        extent = CANVAS_EXTENT as u32
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_enumerate_the_closed_type_set() {
        let prompt = extraction_instructions();
        for ty in ["authority", "entity", "judicial", "service", "other"] {
            assert!(prompt.contains(ty), "prompt must name type `{}`", ty);
        }
    }

    #[test]
    fn instructions_pin_the_canvas_extent_and_json_only_reply() {
        let prompt = extraction_instructions();
        assert!(prompt.contains("0 to 800"));
        assert!(prompt.contains("exactly one JSON object"));
    }
}
