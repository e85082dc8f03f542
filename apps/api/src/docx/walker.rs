//! Tracks where an XML event stream of `word/document.xml` currently is,
//! relative to the top-level body paragraphs and their runs.
//!
//! Shared by the parser and the patcher so both agree on what counts as
//! "paragraph i" and "run j of paragraph i".

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Node {
    Body,
    /// Direct child `w:p` of `w:body`, with its document-order index.
    Paragraph(usize),
    ParagraphProps,
    /// Run inside a top-level paragraph, with its index in that paragraph.
    Run(usize),
    RunProps,
    /// Text-bearing run content: `w:t`, `w:tab`, `w:br`, `w:cr`.
    Content(Content),
    /// Paragraphs nested in tables, text boxes etc. Runs below are ignored.
    Nested,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Content {
    Text,
    Tab,
    Break,
}

#[derive(Debug, Default)]
pub(crate) struct BodyWalker {
    stack: Vec<Node>,
    paragraphs: usize,
    runs: usize,
}

impl BodyWalker {
    /// Classifies and pushes an element by its local name.
    pub fn enter(&mut self, local_name: &[u8]) -> Node {
        let parent = self.stack.last().copied();
        let node = match (local_name, parent) {
            (b"body", _) if !self.stack.contains(&Node::Body) => Node::Body,
            (b"p", Some(Node::Body)) => {
                let index = self.paragraphs;
                self.paragraphs += 1;
                self.runs = 0;
                Node::Paragraph(index)
            }
            (b"p" | b"tbl" | b"txbxContent", _) if self.paragraph().is_some() => Node::Nested,
            (b"pPr", Some(Node::Paragraph(_))) => Node::ParagraphProps,
            (b"r", _) if self.accepts_run() => {
                let index = self.runs;
                self.runs += 1;
                Node::Run(index)
            }
            (b"rPr", Some(Node::Run(_))) => Node::RunProps,
            (b"t", Some(Node::Run(_))) => Node::Content(Content::Text),
            (b"tab", Some(Node::Run(_))) => Node::Content(Content::Tab),
            (b"br" | b"cr", Some(Node::Run(_))) => Node::Content(Content::Break),
            _ => Node::Other,
        };
        self.stack.push(node);
        node
    }

    pub fn leave(&mut self) -> Option<Node> {
        self.stack.pop()
    }

    pub fn parent(&self) -> Option<Node> {
        self.stack.last().copied()
    }

    /// Index of the enclosing top-level paragraph, if any.
    pub fn paragraph(&self) -> Option<usize> {
        self.stack.iter().find_map(|n| match n {
            Node::Paragraph(i) => Some(*i),
            _ => None,
        })
    }

    /// Index of the enclosing run, if any.
    pub fn run(&self) -> Option<usize> {
        self.stack.iter().find_map(|n| match n {
            Node::Run(i) => Some(*i),
            _ => None,
        })
    }

    pub fn in_text(&self) -> bool {
        self.parent() == Some(Node::Content(Content::Text))
    }

    /// Runs count when they sit in a top-level paragraph (directly or via
    /// wrappers such as `w:hyperlink`), outside nested stories and runs.
    fn accepts_run(&self) -> bool {
        self.paragraph().is_some() && self.run().is_none() && !self.stack.contains(&Node::Nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_top_level_paragraphs_and_runs() {
        let mut w = BodyWalker::default();
        assert_eq!(w.enter(b"document"), Node::Other);
        assert_eq!(w.enter(b"body"), Node::Body);
        assert_eq!(w.enter(b"p"), Node::Paragraph(0));
        assert_eq!(w.enter(b"r"), Node::Run(0));
        assert_eq!(w.enter(b"t"), Node::Content(Content::Text));
        assert!(w.in_text());
        w.leave();
        w.leave();
        assert_eq!(w.enter(b"hyperlink"), Node::Other);
        assert_eq!(w.enter(b"r"), Node::Run(1));
        w.leave();
        w.leave();
        w.leave();
        assert_eq!(w.enter(b"p"), Node::Paragraph(1));
        assert_eq!(w.enter(b"r"), Node::Run(0));
    }

    #[test]
    fn test_ignores_table_paragraphs_and_text_boxes() {
        let mut w = BodyWalker::default();
        w.enter(b"body");
        assert_eq!(w.enter(b"tbl"), Node::Other);
        assert_eq!(w.enter(b"tr"), Node::Other);
        assert_eq!(w.enter(b"tc"), Node::Other);
        assert_eq!(w.enter(b"p"), Node::Other);
        assert_eq!(w.enter(b"r"), Node::Other);
        for _ in 0..5 {
            w.leave();
        }

        assert_eq!(w.enter(b"p"), Node::Paragraph(0));
        assert_eq!(w.enter(b"r"), Node::Run(0));
        assert_eq!(w.enter(b"drawing"), Node::Other);
        assert_eq!(w.enter(b"txbxContent"), Node::Nested);
        assert_eq!(w.enter(b"p"), Node::Nested);
        assert_eq!(w.enter(b"r"), Node::Other);
    }
}
