//! Tests against real repositories.
//! Each test:
//! - sets up a temporary git repository (and often a bare remote) in temporary directories
//! - shapes it with the `git` binary
//! - renders the prompt with both backends, checks they agree and asserts the line
//!
//! It is useful when debugging to sometimes manually inspect a test-case.
//! ```rust`
//! dbg!(&ctx.dir.path());
//! ctx.dir.leak();
//! ````
//!

mod helpers;
mod options;

use helpers::{RepoTestContext, change_codes, commit, prompt_at};
