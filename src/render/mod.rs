use crate::models::catalog::Product;

/// Width used for right-alignment in RTL mode.
pub const DISPLAY_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn toggled(self) -> Self {
        match self {
            TextDirection::Ltr => TextDirection::Rtl,
            TextDirection::Rtl => TextDirection::Ltr,
        }
    }
}

/// One block of a formatted model reply. The line-prefix mapping is the
/// single formatting policy for all reply paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBlock {
    Heading(String),
    Subheading(String),
    Bullet(String),
    Step(String),
    Paragraph(String),
    Break,
}

/// Strips control and escape characters from model output before it reaches
/// the terminal. Newlines survive; everything else non-printable is dropped,
/// including ESC so replies cannot smuggle ANSI sequences.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}

fn is_numbered_step(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with('.')
}

/// Line-by-line mapping from markdown-like prefixes to reply blocks.
pub fn parse_reply(text: &str) -> Vec<ReplyBlock> {
    sanitize(text)
        .lines()
        .map(|line| {
            if let Some(rest) = line.strip_prefix("## ") {
                ReplyBlock::Subheading(rest.to_string())
            } else if let Some(rest) = line.strip_prefix("# ") {
                ReplyBlock::Heading(rest.to_string())
            } else if let Some(rest) = line.strip_prefix("- ") {
                ReplyBlock::Bullet(rest.to_string())
            } else if line.trim().is_empty() {
                ReplyBlock::Break
            } else if is_numbered_step(line) {
                ReplyBlock::Step(line.to_string())
            } else {
                ReplyBlock::Paragraph(line.to_string())
            }
        })
        .collect()
}

fn align(line: &str, direction: TextDirection) -> String {
    match direction {
        TextDirection::Ltr => line.to_string(),
        TextDirection::Rtl => format!("{:>width$}", line, width = DISPLAY_WIDTH),
    }
}

/// Renders a model reply as plain terminal text. Both the routine and the
/// follow-up paths go through here.
pub fn render_reply(text: &str, direction: TextDirection) -> String {
    let mut out = Vec::new();
    for block in parse_reply(text) {
        match block {
            ReplyBlock::Heading(text) => {
                out.push(align(&text, direction));
                out.push(align(&"=".repeat(text.chars().count().min(DISPLAY_WIDTH)), direction));
            }
            ReplyBlock::Subheading(text) => {
                out.push(align(&text, direction));
                out.push(align(&"-".repeat(text.chars().count().min(DISPLAY_WIDTH)), direction));
            }
            ReplyBlock::Bullet(text) => out.push(align(&format!("  * {}", text), direction)),
            ReplyBlock::Step(text) => out.push(align(&format!("  {}", text), direction)),
            ReplyBlock::Paragraph(text) => out.push(align(&text, direction)),
            ReplyBlock::Break => out.push(String::new()),
        }
    }
    out.join("\n")
}

/// Product grid: numbered cards with a selection marker.
pub fn render_grid(
    products: &[Product],
    selection: &[Product],
    direction: TextDirection
) -> String {
    if products.is_empty() {
        return align("No products match the current filter", direction);
    }

    products
        .iter()
        .enumerate()
        .map(|(index, product)| {
            let selected = selection.iter().any(|p| p.name == product.name);
            let marker = if selected { "[x]" } else { "[ ]" };
            align(
                &format!("{:>3}. {} {} ({})", index + 1, marker, product.name, product.category),
                direction
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Selection panel: numbered removable list, placeholder when empty.
pub fn render_selection(selection: &[Product], direction: TextDirection) -> String {
    if selection.is_empty() {
        return align("No products selected yet", direction);
    }

    selection
        .iter()
        .enumerate()
        .map(|(index, product)| {
            align(&format!("{:>3}. {} ({})", index + 1, product.name, product.category), direction)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Details view: full description, benefits, and ingredients. Non-mutating.
pub fn render_details(product: &Product, direction: TextDirection) -> String {
    let mut out = Vec::new();
    out.push(align(&product.name, direction));
    out.push(align(&"=".repeat(product.name.chars().count().min(DISPLAY_WIDTH)), direction));
    out.push(align(&format!("Category: {}", product.category), direction));
    out.push(
        align(
            product.description.as_deref().unwrap_or("No description available."),
            direction
        )
    );

    if let Some(benefits) = &product.benefits {
        out.push(String::new());
        out.push(align("Benefits:", direction));
        for benefit in benefits {
            out.push(align(&format!("  * {}", benefit), direction));
        }
    }

    if let Some(ingredients) = &product.ingredients {
        out.push(String::new());
        out.push(align("Key Ingredients:", direction));
        out.push(align(ingredients, direction));
    }

    out.join("\n")
}
