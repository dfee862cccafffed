//! Block model of a generated document.
//!
//! A document is read as a sequence of plain text blocks and `autobehave`
//! placeholder nodes. Resolving the document swaps every placeholder for a
//! `raw:: html` block holding the rendered fragment.

use crate::model::{AUTOBEHAVE_DIRECTIVE, ModuleRef};

const RAW_INDENT: &str = "    ";

/// Placeholder for rendered step metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoBehaveNode {
    /// Modules listed in the directive content.
    pub modules: Vec<ModuleRef>,
}

/// A top-level block of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Lines copied through unchanged.
    Text(Vec<String>),
    /// An `autobehave` directive awaiting rendering.
    AutoBehave(AutoBehaveNode),
}

/// A parsed reStructuredText document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepDocument {
    /// Blocks in document order.
    pub blocks: Vec<Block>,
}

fn is_directive_start(line: &str) -> bool {
    line.strip_prefix("..")
        .filter(|rest| rest.starts_with(' '))
        .map(str::trim)
        .is_some_and(|rest| {
            rest.strip_prefix(AUTOBEHAVE_DIRECTIVE)
                .is_some_and(|tail| tail.trim_end() == "::")
        })
}

fn is_content_line(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with([' ', '\t'])
}

impl StepDocument {
    /// Split `text` into text blocks and directive placeholders.
    ///
    /// # Examples
    /// ```
    /// use stepdoc::render::{Block, StepDocument};
    /// let doc = StepDocument::parse("Title\n=====\n\n..  autobehave::\n\n    steps.login\n");
    /// assert_eq!(doc.nodes().count(), 1);
    /// assert!(matches!(doc.blocks.first(), Some(Block::Text(_))));
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut blocks = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        let mut lines = text.lines().peekable();
        while let Some(line) = lines.next() {
            if !is_directive_start(line) {
                pending.push(line.to_owned());
                continue;
            }
            if !pending.is_empty() {
                blocks.push(Block::Text(std::mem::take(&mut pending)));
            }
            let mut content = Vec::new();
            while let Some(next) = lines.next_if(|next| is_content_line(next)) {
                content.push(next);
            }
            let trailing = content
                .iter()
                .rev()
                .take_while(|line| line.trim().is_empty())
                .count();
            let body_len = content.len() - trailing;
            let modules = content
                .iter()
                .take(body_len)
                .map(|line| line.trim())
                .filter(|line| !line.is_empty() && !line.starts_with(':'))
                .map(ModuleRef::from)
                .collect();
            blocks.push(Block::AutoBehave(AutoBehaveNode { modules }));
            pending.extend(content.iter().skip(body_len).map(|line| (*line).to_owned()));
        }
        if !pending.is_empty() {
            blocks.push(Block::Text(pending));
        }
        Self { blocks }
    }

    /// Iterate over the placeholder nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &AutoBehaveNode> {
        self.blocks.iter().filter_map(|block| match block {
            Block::AutoBehave(node) => Some(node),
            Block::Text(_) => None,
        })
    }

    /// Render every placeholder with `render` and return the document text.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `render`.
    pub fn resolve<E>(
        &self,
        mut render: impl FnMut(&AutoBehaveNode) -> Result<String, E>,
    ) -> Result<String, E> {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Text(lines) => {
                    for line in lines {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                Block::AutoBehave(node) => {
                    let html = render(node)?;
                    out.push_str(".. raw:: html\n\n");
                    for line in html.lines() {
                        if !line.trim().is_empty() {
                            out.push_str(RAW_INDENT);
                            out.push_str(line);
                        }
                        out.push('\n');
                    }
                }
            }
        }
        Ok(out)
    }
}
