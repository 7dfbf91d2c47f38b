//! Shared test utilities for osseo-db unit tests.
