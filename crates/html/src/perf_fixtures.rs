pub const BLOCK_TEMPLATE: &str = "<div class=box data-goradd id=b><span>hello</span><img data-goradd src=x></div>";

/// Marked elements located per `BLOCK_TEMPLATE` repetition.
pub const LOCATED_PER_BLOCK: usize = 2;

pub fn make_blocks(blocks: usize) -> String {
    let mut html = String::with_capacity(BLOCK_TEMPLATE.len() * blocks);
    for _ in 0..blocks {
        html.push_str(BLOCK_TEMPLATE);
    }
    html
}

/// `depth` marked `<div>`s nested inside each other, all closed.
pub fn make_nested(depth: usize) -> String {
    let mut html = String::with_capacity(depth * 32);
    for _ in 0..depth {
        html.push_str("<div data-goradd>");
    }
    for _ in 0..depth {
        html.push_str("</div>");
    }
    html
}

/// `depth` open `<p>` frames followed by the same number of unmatched `</b>`
/// end tags; every end tag scans the whole stack.
pub fn make_unmatched_scan(depth: usize) -> String {
    let mut html = String::with_capacity(depth * 7);
    for _ in 0..depth {
        html.push_str("<p>");
    }
    for _ in 0..depth {
        html.push_str("</b>");
    }
    html
}
