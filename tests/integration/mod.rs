mod comparison_tests;
mod harness_tests;
mod property_tests;
mod report_tests;
