// src/extract/mod.rs
// Best-effort extraction of typed entities from the legacy server's
// semi-structured markup. Each rule is an independent extractor; their
// outputs are reconciled by project id. Malformed or partial matches are
// skipped silently, never treated as a parse error.

pub mod projects;
pub mod week;
