//! Scenario tests that drive several modules together
