// Adapters layer: concrete implementations for external systems (files, spreadsheets).

pub mod tabular;
