//! Run directories pre-filled the way the crawl phase would leave them.

use std::fs;
use std::path::Path;

use choom_core::recon::run_dir::{ENDPOINTS_FILE, ENDPOINTS_FILTERED_FILE, ENDPOINTS_JS_FILE};

pub const JS_URLS: &str = "https://shop.example.com/static/app.js\n\
                           https://shop.example.com/static/vendor.js\n";

pub const ENDPOINTS: &str = "https://shop.example.com/item?id=1\n\
                             https://shop.example.com/item?id=2&ref=home\n\
                             https://shop.example.com/backup.zip\n";

/// Writes `endpointsJs.txt` and `endpoints.txt` into `dir`.
pub fn crawled(dir: &Path) {
    fs::write(dir.join(ENDPOINTS_JS_FILE), JS_URLS).unwrap();
    fs::write(dir.join(ENDPOINTS_FILE), ENDPOINTS).unwrap();
}

/// Also writes `endpoints_filtered.txt`, standing in for the 403 filter.
pub fn crawled_and_filtered(dir: &Path, filtered: &str) {
    crawled(dir);
    fs::write(dir.join(ENDPOINTS_FILTERED_FILE), filtered).unwrap();
}
