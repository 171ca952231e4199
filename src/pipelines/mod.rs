pub mod read_filter;
