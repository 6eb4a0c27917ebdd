//! End-to-end pipeline scenarios over in-process fakes.

mod support;
