// Telemetry helpers for JSONL logging when the `telemetry` feature is
// enabled. Manually formats JSON to avoid a serde_json dependency.

use crate::ident::Oid;

fn ts_micros() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros()
}

/// Emits a removal telemetry event after a cascade removal completes.
///
/// Logs the removed oid and the number of inbound bindings detached as a
/// JSON line to stdout. Best-effort: I/O errors are ignored and timestamps
/// fall back to 0 on clock errors.
pub(crate) fn removed(oid: Oid, detached: usize) {
    use std::io::Write as _;
    let mut out = std::io::stdout().lock();
    let _ = write!(
        out,
        r#"{{"timestamp_micros":{},"event":"removed","oid":{},"detached":{}}}"#,
        ts_micros(),
        oid.value(),
        detached
    );
    let _ = out.write_all(b"\n");
}

/// Emits an apply telemetry event after a modifier application commits.
///
/// Logs the anchor oid, tag delta sizes, and binding edit count as a JSON
/// line to stdout. Best-effort: I/O errors are ignored and timestamps fall
/// back to 0 on clock errors.
pub(crate) fn applied(anchor: Oid, added: usize, removed: usize, bindings: usize) {
    use std::io::Write as _;
    let mut out = std::io::stdout().lock();
    let _ = write!(
        out,
        r#"{{"timestamp_micros":{},"event":"applied","anchor":{},"tags_added":{},"tags_removed":{},"binding_edits":{}}}"#,
        ts_micros(),
        anchor.value(),
        added,
        removed,
        bindings
    );
    let _ = out.write_all(b"\n");
}
