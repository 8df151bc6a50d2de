//! Integration tests for the document store tree.

mod nested_propagation;
mod query_scan;
