mod app_test;
mod fixture;
