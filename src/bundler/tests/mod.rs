use super::*;
use crate::bundler::test_helpers::{
    StubFetcher, archive_entries, create_http_bundler, create_stub_bundler, links, test_config,
};
use crate::error::{Error, TaskError};
use crate::types::Status;
