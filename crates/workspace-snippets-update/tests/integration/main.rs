// Copyright 2026 Google LLC

//! Integration tests for workspace-snippets-update.

mod helpers;
mod resolve;
mod update;
