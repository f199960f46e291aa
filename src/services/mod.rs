// Service module exports

pub mod appointment_book;
pub mod settings;
