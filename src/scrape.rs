use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Writer};
use regex::Regex;
use std::path::Path;

/// Site the recipe pages live on; extracted image paths are relative to it.
pub const SITE_BASE_URL: &str = "https://www.archanaskitchen.com";

const URL_COL: &str = "url";
const IMAGE_COL: &str = "recipe_image";

// The fixed markup heuristic: the recipe photo is the first <img> styled
// with an "object-cover" class, and real photos are served through the
// site's /_next/image endpoint.
const IMAGE_CLASS_MARKER: &str = "object-cover";
const IMAGE_SRC_PREFIX: &str = "/_next/image";

/// Locates a recipe's image URL in a fetched page via the markup heuristic.
/// Regexes are compiled once per scraper.
pub struct ImageScraper {
    img_tag_re: Regex,
    class_attr_re: Regex,
    src_attr_re: Regex,
}

impl ImageScraper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            img_tag_re: Regex::new(r"<img\b[^>]*>").context("Failed to compile img tag regex")?,
            class_attr_re: Regex::new(r#"class\s*=\s*"([^"]*)""#)
                .context("Failed to compile class attribute regex")?,
            src_attr_re: Regex::new(r#"src\s*=\s*"([^"]*)""#)
                .context("Failed to compile src attribute regex")?,
        })
    }

    /// Returns the absolute image URL, or `None` when the page does not
    /// follow the expected markup. Only the first `<img>` whose class
    /// contains the marker is considered; if its `src` does not carry the
    /// expected prefix the page counts as having no image.
    pub fn extract_image_url(&self, html: &str) -> Option<String> {
        let candidate = self.img_tag_re.find_iter(html).find(|tag| {
            self.class_attr_re
                .captures(tag.as_str())
                .map(|caps| caps[1].contains(IMAGE_CLASS_MARKER))
                .unwrap_or(false)
        })?;

        let src = self.src_attr_re.captures(candidate.as_str())?;
        let src = &src[1];
        if src.starts_with(IMAGE_SRC_PREFIX) {
            Some(format!("{}{}", SITE_BASE_URL, src))
        } else {
            None
        }
    }
}

/// A recipe CSV held as raw records so every column passes through the
/// backfill untouched. Only the `url` column is interpreted; the
/// `recipe_image` column is replaced when present and appended otherwise.
#[derive(Debug)]
pub struct RecipeTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    url_idx: usize,
    image_idx: Option<usize>,
}

impl RecipeTable {
    pub fn load(csv_path: &Path) -> Result<Self> {
        let file = std::fs::File::open(csv_path)
            .with_context(|| format!("Failed to open recipe CSV file at {:?}", csv_path))?;
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = rdr.headers()?.clone();
        let url_idx = headers
            .iter()
            .position(|h| h == URL_COL)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", URL_COL))?;
        let image_idx = headers.iter().position(|h| h == IMAGE_COL);

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result
                .with_context(|| format!("Failed to read record at row index {}", row_index))?;
            rows.push(record);
        }

        Ok(Self {
            headers,
            rows,
            url_idx,
            image_idx,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn url(&self, row: usize) -> &str {
        self.rows[row].get(self.url_idx).unwrap_or_default()
    }

    fn headers_with_image(&self) -> StringRecord {
        match self.image_idx {
            Some(_) => self.headers.clone(),
            None => {
                let mut headers = self.headers.clone();
                headers.push_field(IMAGE_COL);
                headers
            }
        }
    }

    fn row_with_image(&self, row: usize, image: &str) -> StringRecord {
        let record = &self.rows[row];
        let mut out = StringRecord::new();
        match self.image_idx {
            Some(idx) => {
                for (i, field) in record.iter().enumerate() {
                    out.push_field(if i == idx { image } else { field });
                }
            }
            None => {
                for field in record.iter() {
                    out.push_field(field);
                }
                out.push_field(image);
            }
        }
        out
    }

    /// Writes the processed slice (`start..start + images.len()`) with its
    /// image column — the periodic checkpoint file.
    pub fn write_checkpoint(&self, path: &Path, start: usize, images: &[String]) -> Result<()> {
        let mut wtr = Writer::from_path(path)
            .with_context(|| format!("Failed to create checkpoint file at {:?}", path))?;
        wtr.write_record(&self.headers_with_image())?;
        for (offset, image) in images.iter().enumerate() {
            wtr.write_record(&self.row_with_image(start + offset, image))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes the whole table with the processed range's images merged in;
    /// rows outside the range keep their existing image value (or get an
    /// empty one if the column is being introduced).
    pub fn write_merged(&self, path: &Path, start: usize, images: &[String]) -> Result<()> {
        let mut wtr = Writer::from_path(path)
            .with_context(|| format!("Failed to create output file at {:?}", path))?;
        wtr.write_record(&self.headers_with_image())?;
        for row in 0..self.rows.len() {
            let record = if row >= start && row < start + images.len() {
                self.row_with_image(row, &images[row - start])
            } else if self.image_idx.is_some() {
                self.rows[row].clone()
            } else {
                self.row_with_image(row, "")
            };
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
