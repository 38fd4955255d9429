//! Span index: multi-document scoped text assembly and offset mapping
//!
//! A scoped text is the concatenation of per-document text blocks, one block
//! per source document, separated by [`DOCUMENT_SEPARATOR`]. The span index
//! records where each document's block lives inside the concatenation so a
//! quote's global offset can be translated back into a
//! `(document_id, local_start, local_end)` triple.
//!
//! Offsets into a scoped text are stable for the lifetime of one extraction
//! pass. Any post-hoc cleaning of the text invalidates previously computed
//! spans; callers must rebuild, never reuse.

use personaforge_core::{
    DocSpan, TranscriptSegment, DOCUMENT_SEPARATOR, FRAGMENT_JOINER, ORIGINAL_TEXT_DOC_ID,
};

/// Build a scoped text plus its span index from ordered transcript segments.
///
/// Fragments are grouped by `document_id` in first-seen order; within a group
/// they are joined with [`FRAGMENT_JOINER`], across groups with
/// [`DOCUMENT_SEPARATOR`]. A group whose fragments are all empty still gets a
/// zero-length span so its document id stays addressable.
///
/// Total function: empty input yields `("", vec![])`.
pub fn build_scoped_text_and_spans(segments: &[TranscriptSegment]) -> (String, Vec<DocSpan>) {
    let mut order: Vec<&str> = Vec::new();
    let mut fragments: Vec<Vec<&str>> = Vec::new();

    for segment in segments {
        let doc_id: &str = if segment.document_id.trim().is_empty() {
            ORIGINAL_TEXT_DOC_ID
        } else {
            &segment.document_id
        };
        let idx = match order.iter().position(|id| *id == doc_id) {
            Some(idx) => idx,
            None => {
                order.push(doc_id);
                fragments.push(Vec::new());
                order.len() - 1
            }
        };
        let text = segment.dialogue.trim();
        if !text.is_empty() {
            fragments[idx].push(text);
        }
    }

    let mut scoped = String::new();
    let mut spans = Vec::with_capacity(order.len());

    for (idx, doc_id) in order.iter().enumerate() {
        if idx > 0 {
            scoped.push_str(DOCUMENT_SEPARATOR);
        }
        let start = scoped.len();
        scoped.push_str(&fragments[idx].join(FRAGMENT_JOINER));
        spans.push(DocSpan {
            document_id: doc_id.to_string(),
            start,
            end: scoped.len(),
        });
    }

    (scoped, spans)
}

/// Translate a global `[start, end)` offset pair in the scoped text into
/// per-document coordinates.
///
/// The span containing `global_start` wins; `local_end` is clamped to the
/// span's length. When no span contains the offset (separator gap, or empty
/// index) the mapping passes the offsets through under the sentinel document
/// id. Total: always produces a result, and the document id is never empty.
pub fn map_to_document(
    global_start: usize,
    global_end: usize,
    spans: &[DocSpan],
) -> (String, usize, usize) {
    for span in spans {
        if span.contains(global_start) {
            let local_start = global_start - span.start;
            let local_end = (global_end.saturating_sub(span.start)).min(span.len());
            return (span.document_id.clone(), local_start, local_end);
        }
    }
    (ORIGINAL_TEXT_DOC_ID.to_string(), global_start, global_end)
}
