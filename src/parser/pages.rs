use tracing::debug;

use super::blocks::{parse_block, RawBlock, MAX_BLOCK_LINES};
use super::context::{is_heading, Context};
use super::extract::extract_license_number;
use crate::error::DocumentError;
use crate::record::Provider;

/// Page header and legend text repeated on every roster page.
const BOILERPLATE: &[&str] = &[
    "CHILD CARE LICENSING ROSTER",
    "Date of Printing:",
    "ZIP CODE",
    "PROVIDER NAME",
    "OWNER NAME",
    "PHONE NUMBER",
];

/// Trailer printed after the last provider of each zip group.
const GROUP_TOTAL: &str = "Total Number in Zip Code:";

#[derive(Debug, Default)]
pub struct Walk {
    pub providers: Vec<Provider>,
    pub pages: usize,
    pub blocks: usize,
    pub rejected: usize,
}

/// Walk every page after the cover page and collect providers in document order.
pub fn walk<S: AsRef<str>>(pages: &[Vec<S>]) -> Result<Walk, DocumentError> {
    let Some((_cover, data_pages)) = pages.split_first() else {
        return Err(DocumentError::NoDataPages);
    };
    if data_pages.is_empty() {
        return Err(DocumentError::NoDataPages);
    }

    let mut ctx = Context::default();
    let mut walk = Walk {
        pages: data_pages.len(),
        ..Default::default()
    };

    for (page_idx, page) in data_pages.iter().enumerate() {
        let lines: Vec<&str> = page
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .collect();
        walk_page(&lines, &mut ctx, &mut walk);
        debug!(page = page_idx + 2, providers = walk.providers.len(), "page walked");
    }

    if walk.blocks == 0 {
        return Err(DocumentError::NoProviders { pages: walk.pages });
    }
    Ok(walk)
}

fn walk_page(lines: &[&str], ctx: &mut Context, walk: &mut Walk) {
    let mut lead: Option<&str> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if ctx.update(line) || is_separator(line) {
            lead = None;
            i += 1;
            continue;
        }

        if extract_license_number(line).is_none() {
            lead = Some(line);
            i += 1;
            continue;
        }

        let end = block_end(lines, i);
        let block = RawBlock {
            lead: lead.take(),
            lines: &lines[i..end],
        };
        walk.blocks += 1;
        match parse_block(&block, &ctx.snapshot()) {
            Some(provider) => walk.providers.push(provider),
            None => {
                walk.rejected += 1;
                debug!(line, "block rejected");
            }
        }
        i = end;
    }
}

/// One past the last line of the block anchored at `start`.
fn block_end(lines: &[&str], start: usize) -> usize {
    let limit = (start + MAX_BLOCK_LINES).min(lines.len());
    (start + 1..limit)
        .find(|&j| {
            let line = lines[j];
            extract_license_number(line).is_some() || is_heading(line) || is_separator(line)
        })
        .unwrap_or(limit)
}

fn is_separator(line: &str) -> bool {
    line.starts_with(GROUP_TOTAL) || BOILERPLATE.iter().any(|b| line.contains(b))
}
