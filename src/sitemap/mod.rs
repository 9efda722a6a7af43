// src/sitemap/mod.rs
// =============================================================================
// This module turns the crawl result into a sitemap document.
//
// The format follows https://www.sitemaps.org/protocol.html:
//   <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//     <url>
//       <loc>https://example.com/page</loc>
//     </url>
//   </urlset>
// =============================================================================

mod render;

pub use render::{write_sitemap, Destination};
