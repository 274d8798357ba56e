//! Single-field lookups used as cascade steps

use crate::document::{Document, ElementRef};
use crate::platform::VideoContext;
use std::sync::Arc;

/// What a locator gets to look at
#[derive(Clone, Copy)]
pub struct PageView<'a> {
    pub doc: &'a dyn Document,
    pub context: &'a VideoContext,
}

impl<'a> PageView<'a> {
    pub fn new(doc: &'a dyn Document, context: &'a VideoContext) -> Self {
        Self { doc, context }
    }
}

/// One attempt at finding a field value
pub trait Locate: Send + Sync {
    fn locate(&self, view: &PageView<'_>) -> Option<String>;
}

impl<L: Locate + ?Sized> Locate for Arc<L> {
    fn locate(&self, view: &PageView<'_>) -> Option<String> {
        (**self).locate(view)
    }
}

/// Where a selector is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Document,
    /// Under the context's container (post, dialog); misses when there is none
    Context,
}

impl Scope {
    /// `None` when the scope cannot be resolved, `Some(None)` for the whole document
    fn root(self, view: &PageView<'_>) -> Option<Option<ElementRef>> {
        match self {
            Scope::Document => Some(None),
            Scope::Context => view.context.scope.map(Some),
        }
    }
}

/// `textContent` of the first match
#[derive(Debug, Clone)]
pub struct Text {
    selector: String,
    scope: Scope,
}

impl Locate for Text {
    fn locate(&self, view: &PageView<'_>) -> Option<String> {
        let root = self.scope.root(view)?;
        view.doc.query_text(root, &self.selector)
    }
}

/// Attribute of the first match
#[derive(Debug, Clone)]
pub struct Attr {
    selector: String,
    name: String,
    scope: Scope,
}

impl Locate for Attr {
    fn locate(&self, view: &PageView<'_>) -> Option<String> {
        let root = self.scope.root(view)?;
        view.doc.query_attr(root, &self.selector, &self.name)
    }
}

/// `document.title` with a site suffix removed
#[derive(Debug, Clone)]
pub struct DocumentTitle {
    strip_suffix: String,
}

impl Locate for DocumentTitle {
    fn locate(&self, view: &PageView<'_>) -> Option<String> {
        let title = view.doc.title();
        let title = title.strip_suffix(&self.strip_suffix).unwrap_or(title.as_str()).trim();
        (!title.is_empty()).then(|| title.to_string())
    }
}

/// Poster of the context's video, else of the first video on the page
#[derive(Debug, Clone, Copy)]
pub struct VideoPoster;

impl Locate for VideoPoster {
    fn locate(&self, view: &PageView<'_>) -> Option<String> {
        let probe = match view.context.video {
            Some(el) => view.doc.video(el),
            None => view.doc.videos().into_iter().next(),
        };
        probe?.poster.filter(|p| !p.trim().is_empty())
    }
}

/// Computed from the view
#[derive(Clone, Copy)]
pub struct Derived(pub fn(&PageView<'_>) -> Option<String>);

impl Locate for Derived {
    fn locate(&self, view: &PageView<'_>) -> Option<String> {
        (self.0)(view)
    }
}

/// First `max_chars` of another locator's trimmed result
#[derive(Clone)]
pub struct Prefix {
    inner: Arc<dyn Locate>,
    max_chars: usize,
}

impl Locate for Prefix {
    fn locate(&self, view: &PageView<'_>) -> Option<String> {
        let value = self.inner.locate(view)?;
        let cut = vsense_core::prefix(value.trim(), self.max_chars);
        (!cut.is_empty()).then(|| cut.to_string())
    }
}

pub fn text(selector: &str) -> Text {
    Text {
        selector: selector.to_string(),
        scope: Scope::Document,
    }
}

pub fn scoped_text(selector: &str) -> Text {
    Text {
        selector: selector.to_string(),
        scope: Scope::Context,
    }
}

pub fn attr(selector: &str, name: &str) -> Attr {
    Attr {
        selector: selector.to_string(),
        name: name.to_string(),
        scope: Scope::Document,
    }
}

pub fn document_title(strip_suffix: &str) -> DocumentTitle {
    DocumentTitle {
        strip_suffix: strip_suffix.to_string(),
    }
}

pub fn prefix_of(inner: impl Locate + 'static, max_chars: usize) -> Prefix {
    Prefix {
        inner: Arc::new(inner),
        max_chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::StaticDocument;
    use vsense_core::Platform;

    fn context(doc: &StaticDocument, scope: Option<ElementRef>) -> VideoContext {
        VideoContext {
            id: doc.location(),
            platform: Platform::Linkedin,
            location: doc.location(),
            video: None,
            scope,
        }
    }

    #[test]
    fn test_scoped_text_requires_scope() {
        let doc = StaticDocument::new("https://www.linkedin.com/feed/");
        let post = doc.element("article");
        doc.add_in(Some(post), ".actor", "Ada");

        let unscoped = context(&doc, None);
        assert_eq!(scoped_text(".actor").locate(&PageView::new(&doc, &unscoped)), None);
        assert_eq!(
            text(".actor").locate(&PageView::new(&doc, &unscoped)).as_deref(),
            Some("Ada")
        );

        let scoped = context(&doc, Some(post));
        assert_eq!(
            scoped_text(".actor").locate(&PageView::new(&doc, &scoped)).as_deref(),
            Some("Ada")
        );
    }

    #[test]
    fn test_document_title_strips_suffix() {
        let doc = StaticDocument::new("https://www.youtube.com/watch?v=1");
        doc.set_title("Great Video - YouTube");
        let ctx = context(&doc, None);

        let found = document_title(" - YouTube").locate(&PageView::new(&doc, &ctx));
        assert_eq!(found.as_deref(), Some("Great Video"));

        doc.set_title(" - YouTube");
        assert_eq!(document_title(" - YouTube").locate(&PageView::new(&doc, &ctx)), None);
    }

    #[test]
    fn test_prefix_cuts_without_ellipsis() {
        let doc = StaticDocument::new("https://www.instagram.com/reel/1/");
        doc.add("article h1", "  abcdefghij  ");
        let ctx = context(&doc, None);

        let found = prefix_of(text("article h1"), 4).locate(&PageView::new(&doc, &ctx));
        assert_eq!(found.as_deref(), Some("abcd"));
    }

    #[test]
    fn test_attr_and_derived() {
        let doc = StaticDocument::new("https://www.youtube.com/watch?v=1");
        let button = doc.element("#like");
        doc.set_attr(button, "aria-label", "like this along with 5 others");
        let ctx = context(&doc, None);
        let view = PageView::new(&doc, &ctx);

        assert_eq!(
            attr("#like", "aria-label").locate(&view).as_deref(),
            Some("like this along with 5 others")
        );
        assert_eq!(attr("#like", "title").locate(&view), None);

        let from_location = Derived(|view| Some(view.context.location.to_uppercase()));
        assert_eq!(
            from_location.locate(&view).as_deref(),
            Some("HTTPS://WWW.YOUTUBE.COM/WATCH?V=1")
        );
    }
}
