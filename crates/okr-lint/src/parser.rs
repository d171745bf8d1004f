//! Structural parser for report documents.
//!
//! Reconstructs the report grammar from the markdown event stream in a
//! single pass:
//!
//! - level-1 headings open sections, filtered by a [`SectionFilter`]
//! - level-2 headings and bold-only paragraphs set the current project
//! - top-level list items are KR lines; their nested items are children
//! - level-3 and deeper headings also act as KR titles, taking the list
//!   items that follow as their children
//!
//! Among a KR's children, lines starting with `@` are time entry
//! candidates and must parse; everything else is a work item. The walk
//! stops at the first structural error in document order.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use okr_report::{KrEntry, KrKind, SectionFilter, TimeEntry};

use crate::error::LintError;

/// Parse a document into KR entries, visiting only sections the filter
/// admits. Section titles are collected for the whole document, so an
/// include set is checked against everything the input actually contains.
pub fn parse(text: &str, filter: &SectionFilter) -> Result<Vec<KrEntry>, LintError> {
    let mut walk = Walk::new(filter);
    for event in Parser::new(text) {
        walk.on_event(event)?;
    }
    walk.finish()
}

/// In-flight KR state while its children are being read.
#[derive(Default)]
struct KrBuilder {
    title: String,
    title_checked: bool,
    time: Option<TimeEntry>,
    work: Vec<String>,
    has_children: bool,
}

impl KrBuilder {
    fn new(title: String) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    /// Validate the ID slot once the title text is complete.
    fn check_title(&mut self) -> Result<(), LintError> {
        if !self.title_checked {
            self.title = self.title.trim().to_string();
            if KrKind::classify(&self.title).is_none() {
                return Err(LintError::NoKrId(self.title.clone()));
            }
            self.title_checked = true;
        }
        Ok(())
    }
}

/// Paragraph state used to detect bold-only project lines.
#[derive(Default)]
struct Para {
    text: String,
    bold: bool,
    in_strong: bool,
    mixed: bool,
}

/// An open child item: its text buffer and the work slot it closes
/// into. Nested items close before their parent, so each item records
/// its slot when it opens and work is inserted there, not appended.
struct Child {
    text: String,
    slot: usize,
}

struct Walk<'a> {
    filter: &'a SectionFilter,
    entries: Vec<KrEntry>,
    /// Every level-1 heading title, visited or not.
    seen_sections: Vec<String>,
    section: Option<String>,
    /// False until the first admitted section heading.
    visiting: bool,
    project: Option<String>,
    kr: Option<KrBuilder>,
    /// The current KR came from a sub-heading, so top-level list items
    /// below it are its children rather than new KR lines.
    from_heading: bool,
    /// Accumulating the text of a KR line item.
    kr_line: bool,
    /// Open child item buffers, innermost last.
    children: Vec<Child>,
    heading: Option<String>,
    para: Option<Para>,
    /// List nesting depth.
    depth: usize,
    in_code: bool,
}

impl<'a> Walk<'a> {
    fn new(filter: &'a SectionFilter) -> Self {
        Self {
            filter,
            entries: Vec::new(),
            seen_sections: Vec::new(),
            section: None,
            visiting: false,
            project: None,
            kr: None,
            from_heading: false,
            kr_line: false,
            children: Vec::new(),
            heading: None,
            para: None,
            depth: 0,
            in_code: false,
        }
    }

    fn on_event(&mut self, event: Event<'_>) -> Result<(), LintError> {
        match event {
            Event::Start(Tag::Heading { level, .. }) => self.start_heading(level),
            Event::End(TagEnd::Heading(level)) => self.end_heading(level),
            Event::Start(Tag::CodeBlock(_)) => {
                self.in_code = true;
                Ok(())
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code = false;
                Ok(())
            }
            Event::Text(text) => {
                self.on_text(&text);
                Ok(())
            }
            Event::Code(code) => {
                self.on_text(&format!("`{code}`"));
                Ok(())
            }
            Event::SoftBreak | Event::HardBreak => {
                self.on_text(" ");
                Ok(())
            }
            // Everything below only matters inside admitted sections.
            _ if !self.visiting => Ok(()),
            Event::Start(Tag::List(_)) => self.start_list(),
            Event::End(TagEnd::List(_)) => {
                self.depth = self.depth.saturating_sub(1);
                Ok(())
            }
            Event::Start(Tag::Item) => self.start_item(),
            Event::End(TagEnd::Item) => self.end_item(),
            Event::Start(Tag::Paragraph) => {
                self.start_paragraph();
                Ok(())
            }
            Event::End(TagEnd::Paragraph) => self.end_paragraph(),
            Event::Start(Tag::Strong) => {
                self.start_strong();
                Ok(())
            }
            Event::End(TagEnd::Strong) => {
                self.end_strong();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn finish(mut self) -> Result<Vec<KrEntry>, LintError> {
        self.finalize_kr()?;
        let missing = self.filter.missing_includes(&self.seen_sections);
        if !missing.is_empty() {
            return Err(LintError::NotAllIncludes(missing));
        }
        tracing::debug!(entries = self.entries.len(), "document parsed");
        Ok(self.entries)
    }

    fn start_heading(&mut self, level: HeadingLevel) -> Result<(), LintError> {
        if level == HeadingLevel::H1 || self.visiting {
            // Any heading ends the KR block before it.
            self.finalize_kr()?;
            self.heading = Some(String::new());
        }
        Ok(())
    }

    fn end_heading(&mut self, level: HeadingLevel) -> Result<(), LintError> {
        let Some(text) = self.heading.take() else {
            return Ok(());
        };
        let title = text.trim().to_string();
        if level == HeadingLevel::H1 {
            self.visiting = self.filter.should_visit(&title);
            tracing::debug!(section = %title, visiting = self.visiting, "section heading");
            self.seen_sections.push(title.clone());
            self.section = Some(title);
            self.project = None;
            return Ok(());
        }
        if level == HeadingLevel::H2 {
            self.project = Some(title).filter(|t| !t.is_empty());
            return Ok(());
        }
        // Deeper headings open a KR whose children follow as list items.
        self.begin_kr(title, true)
    }

    fn begin_kr(&mut self, title: String, from_heading: bool) -> Result<(), LintError> {
        if self.project.is_none() {
            let section = self.section.clone().unwrap_or_default();
            return Err(LintError::NoProjectFound(section));
        }
        let mut kr = KrBuilder::new(title);
        if from_heading {
            kr.check_title()?;
        }
        self.kr = Some(kr);
        self.from_heading = from_heading;
        Ok(())
    }

    fn start_list(&mut self) -> Result<(), LintError> {
        let child_base = if self.from_heading { 0 } else { 1 };
        if self.depth == child_base {
            // The nested list begins the children, so the title is done.
            if let Some(kr) = self.kr.as_mut() {
                kr.check_title()?;
            }
        }
        self.depth += 1;
        Ok(())
    }

    fn start_item(&mut self) -> Result<(), LintError> {
        if !self.from_heading && self.depth == 1 {
            self.kr_line = true;
            return self.begin_kr(String::new(), false);
        }
        self.children.push(Child {
            text: String::new(),
            slot: self.kr.as_ref().map_or(0, |kr| kr.work.len()),
        });
        Ok(())
    }

    fn end_item(&mut self) -> Result<(), LintError> {
        if let Some(child) = self.children.pop() {
            return self.close_child(child);
        }
        // End of a KR line item; the KR is complete.
        self.finalize_kr()
    }

    /// Classify one child line as the time entry or a work item.
    fn close_child(&mut self, child: Child) -> Result<(), LintError> {
        let text = child.text.trim().to_string();
        let Some(kr) = self.kr.as_mut() else {
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }
        kr.has_children = true;
        if TimeEntry::looks_like(&text) {
            match text.parse::<TimeEntry>() {
                Ok(time) => {
                    if kr.time.is_some() {
                        return Err(LintError::MultipleTimeEntries(kr.title.clone()));
                    }
                    kr.time = Some(time);
                }
                Err(_) => return Err(LintError::InvalidTime(text)),
            }
        } else {
            // The recorded slot keeps work in document order even when
            // a nested item closes before its parent.
            let slot = child.slot.min(kr.work.len());
            kr.work.insert(slot, text);
        }
        Ok(())
    }

    /// Validate and emit the pending KR, if any.
    fn finalize_kr(&mut self) -> Result<(), LintError> {
        let Some(mut kr) = self.kr.take() else {
            return Ok(());
        };
        self.from_heading = false;
        self.kr_line = false;
        kr.check_title()?;
        let title = kr.title;
        let kind =
            KrKind::classify(&title).ok_or_else(|| LintError::NoKrId(title.clone()))?;
        if kind.is_no_kr() && !kr.has_children {
            // A bare `No KR` line is explicitly empty.
            self.emit(title, kind, TimeEntry::new(), Vec::new());
            return Ok(());
        }
        let Some(time) = kr.time else {
            return Err(LintError::NoTimeFound(title));
        };
        if kr.work.is_empty() {
            return Err(LintError::NoWorkFound(title));
        }
        self.emit(title, kind, time, kr.work);
        Ok(())
    }

    fn emit(&mut self, title: String, kind: KrKind, time: TimeEntry, work: Vec<String>) {
        self.entries.push(KrEntry {
            section: self.section.clone().unwrap_or_default(),
            project: self.project.clone().unwrap_or_default(),
            title,
            kind,
            time,
            work,
        });
    }

    fn start_paragraph(&mut self) {
        if self.depth == 0 && self.heading.is_none() {
            self.para = Some(Para::default());
        }
    }

    fn end_paragraph(&mut self) -> Result<(), LintError> {
        let Some(para) = self.para.take() else {
            return Ok(());
        };
        let title = para.text.trim().to_string();
        if para.bold && !para.mixed && !title.is_empty() {
            // A bold-only paragraph is a project title.
            self.finalize_kr()?;
            self.project = Some(title);
        }
        Ok(())
    }

    fn start_strong(&mut self) {
        if let Some(para) = self.para.as_mut() {
            if !para.bold && para.text.trim().is_empty() {
                para.bold = true;
                para.in_strong = true;
            } else {
                para.mixed = true;
            }
        }
    }

    fn end_strong(&mut self) {
        if let Some(para) = self.para.as_mut() {
            para.in_strong = false;
        }
    }

    fn on_text(&mut self, text: &str) {
        if self.in_code {
            return;
        }
        if let Some(buf) = self.heading.as_mut() {
            buf.push_str(text);
            return;
        }
        if !self.visiting {
            return;
        }
        if let Some(child) = self.children.last_mut() {
            child.text.push_str(text);
            return;
        }
        if self.kr_line {
            if let Some(kr) = self.kr.as_mut() {
                kr.title.push_str(text);
            }
            return;
        }
        if let Some(para) = self.para.as_mut() {
            if !para.in_strong && !text.trim().is_empty() {
                para.mixed = true;
            }
            para.text.push_str(text);
        }
    }
}
