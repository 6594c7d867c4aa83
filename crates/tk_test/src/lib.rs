//! Golden-file tests live in the workspace `tests/` directory.
