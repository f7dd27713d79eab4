// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV decoding with encoding fallback, and CSV rendering

mod csv_parser;
mod csv_writer;

pub use csv_parser::CsvParser;
pub use csv_writer::CsvWriter;
