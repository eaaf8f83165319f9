mod analysis_tests;
mod clean_tests;
