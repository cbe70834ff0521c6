//! End-to-end tests for logtally live under `tests/`.
