//! In-memory document for fixtures and hosts that pre-resolve selectors.
//!
//! Elements are registered under the selector strings they should answer to;
//! no CSS matching happens here. Handles are cheap clones sharing one page,
//! so a test can keep mutating the page while an observer reads it.

use crate::document::{Document, ElementRef, VideoProbe};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("element references unknown parent '{0}'")]
    UnknownParent(String),
}

/// Media state of a fixture video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoState {
    #[serde(default = "default_true")]
    pub paused: bool,
    #[serde(default)]
    pub duration: f64,
    #[serde(default = "default_true")]
    pub in_viewport: bool,
}

impl Default for VideoState {
    fn default() -> Self {
        Self {
            paused: true,
            duration: 0.0,
            in_viewport: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Serialized page snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFixture {
    pub location: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub elements: Vec<ElementFixture>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementFixture {
    /// Name other elements use to refer to this one as `parent`
    #[serde(default)]
    pub key: Option<String>,
    pub selectors: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attrs: HashMap<String, String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub video: Option<VideoState>,
}

#[derive(Debug, Default)]
struct Node {
    selectors: Vec<String>,
    text: Option<String>,
    attrs: HashMap<String, String>,
    parent: Option<ElementRef>,
    video: Option<VideoState>,
}

#[derive(Debug, Default)]
struct Page {
    location: String,
    title: String,
    next_id: u64,
    // Ordered by handle, which is insertion (document) order
    nodes: BTreeMap<ElementRef, Node>,
}

impl Page {
    fn is_descendant(&self, element: ElementRef, ancestor: ElementRef) -> bool {
        let mut current = self.nodes.get(&element).and_then(|n| n.parent);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.nodes.get(&el).and_then(|n| n.parent);
        }
        false
    }

    fn probe(&self, element: ElementRef, node: &Node) -> Option<VideoProbe> {
        let state = node.video.as_ref()?;
        Some(VideoProbe {
            element,
            src: node.attrs.get("src").cloned(),
            poster: node.attrs.get("poster").cloned(),
            paused: state.paused,
            duration: state.duration,
            in_viewport: state.in_viewport,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    page: Arc<RwLock<Page>>,
}

impl StaticDocument {
    pub fn new(location: &str) -> Self {
        let doc = Self::default();
        doc.write().location = location.to_string();
        doc
    }

    pub fn from_fixture(fixture: &PageFixture) -> Result<Self, FixtureError> {
        let doc = Self::new(&fixture.location);
        doc.set_title(&fixture.title);

        let mut keys: HashMap<&str, ElementRef> = HashMap::new();
        for entry in &fixture.elements {
            let parent = match entry.parent.as_deref() {
                Some(key) => Some(
                    *keys
                        .get(key)
                        .ok_or_else(|| FixtureError::UnknownParent(key.to_string()))?,
                ),
                None => None,
            };

            let el = doc.insert(
                parent,
                Node {
                    selectors: entry.selectors.clone(),
                    text: entry.text.clone(),
                    attrs: entry.attrs.clone(),
                    parent,
                    video: entry.video.clone(),
                },
            );
            if let Some(key) = entry.key.as_deref() {
                keys.insert(key, el);
            }
        }
        Ok(doc)
    }

    pub fn load_fixture(path: &Path) -> Result<Self, FixtureError> {
        let contents = std::fs::read_to_string(path)?;
        let fixture: PageFixture = serde_json::from_str(&contents)?;
        Self::from_fixture(&fixture)
    }

    pub fn set_location(&self, location: &str) {
        self.write().location = location.to_string();
    }

    pub fn set_title(&self, title: &str) {
        self.write().title = title.to_string();
    }

    /// Drop every element, as a full re-render would
    pub fn clear(&self) {
        self.write().nodes.clear();
    }

    /// Empty element answering to `selector`
    pub fn element(&self, selector: &str) -> ElementRef {
        self.element_in(None, selector)
    }

    pub fn element_in(&self, parent: Option<ElementRef>, selector: &str) -> ElementRef {
        self.insert(
            parent,
            Node {
                selectors: vec![selector.to_string()],
                parent,
                ..Default::default()
            },
        )
    }

    /// Element with text content
    pub fn add(&self, selector: &str, text: &str) -> ElementRef {
        self.add_in(None, selector, text)
    }

    pub fn add_in(&self, parent: Option<ElementRef>, selector: &str, text: &str) -> ElementRef {
        let el = self.element_in(parent, selector);
        self.set_text(el, text);
        el
    }

    pub fn add_video(&self, parent: Option<ElementRef>, state: VideoState) -> ElementRef {
        self.insert(
            parent,
            Node {
                selectors: vec!["video".to_string()],
                parent,
                video: Some(state),
                ..Default::default()
            },
        )
    }

    /// Make `element` also answer to `selector`
    pub fn alias(&self, element: ElementRef, selector: &str) {
        if let Some(node) = self.write().nodes.get_mut(&element) {
            node.selectors.push(selector.to_string());
        }
    }

    pub fn set_text(&self, element: ElementRef, text: &str) {
        if let Some(node) = self.write().nodes.get_mut(&element) {
            node.text = Some(text.to_string());
        }
    }

    pub fn set_attr(&self, element: ElementRef, name: &str, value: &str) {
        if let Some(node) = self.write().nodes.get_mut(&element) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_paused(&self, element: ElementRef, paused: bool) {
        if let Some(state) = self.write().nodes.get_mut(&element).and_then(|n| n.video.as_mut()) {
            state.paused = paused;
        }
    }

    pub fn set_in_viewport(&self, element: ElementRef, in_viewport: bool) {
        if let Some(state) = self.write().nodes.get_mut(&element).and_then(|n| n.video.as_mut()) {
            state.in_viewport = in_viewport;
        }
    }

    /// Remove an element and everything under it
    pub fn remove(&self, element: ElementRef) {
        let mut page = self.write();
        let doomed: Vec<ElementRef> = page
            .nodes
            .keys()
            .copied()
            .filter(|&el| el == element || page.is_descendant(el, element))
            .collect();
        for el in doomed {
            page.nodes.remove(&el);
        }
    }

    fn insert(&self, parent: Option<ElementRef>, mut node: Node) -> ElementRef {
        let mut page = self.write();
        let el = ElementRef(page.next_id);
        page.next_id += 1;
        node.parent = parent;
        page.nodes.insert(el, node);
        el
    }

    fn read(&self) -> RwLockReadGuard<'_, Page> {
        self.page.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Page> {
        self.page.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Document for StaticDocument {
    fn location(&self) -> String {
        self.read().location.clone()
    }

    fn title(&self) -> String {
        self.read().title.clone()
    }

    fn query(&self, scope: Option<ElementRef>, selector: &str) -> Option<ElementRef> {
        let page = self.read();
        page.nodes
            .iter()
            .filter(|(_, node)| node.selectors.iter().any(|s| s == selector))
            .map(|(&el, _)| el)
            .find(|&el| scope.map_or(true, |s| page.is_descendant(el, s)))
    }

    fn closest(&self, element: ElementRef, selector: &str) -> Option<ElementRef> {
        let page = self.read();
        let mut current = Some(element);
        while let Some(el) = current {
            let node = page.nodes.get(&el)?;
            if node.selectors.iter().any(|s| s == selector) {
                return Some(el);
            }
            current = node.parent;
        }
        None
    }

    fn parent(&self, element: ElementRef) -> Option<ElementRef> {
        self.read().nodes.get(&element)?.parent
    }

    fn text(&self, element: ElementRef) -> Option<String> {
        self.read().nodes.get(&element)?.text.clone()
    }

    fn attr(&self, element: ElementRef, name: &str) -> Option<String> {
        self.read().nodes.get(&element)?.attrs.get(name).cloned()
    }

    fn video(&self, element: ElementRef) -> Option<VideoProbe> {
        let page = self.read();
        let node = page.nodes.get(&element)?;
        page.probe(element, node)
    }

    fn videos(&self) -> Vec<VideoProbe> {
        let page = self.read();
        page.nodes
            .iter()
            .filter_map(|(&el, node)| page.probe(el, node))
            .collect()
    }
}
