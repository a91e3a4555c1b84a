use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LinkError;

pub const DEFAULT_DELIMITER: &str = "-";

/// A user configured keyword that expands into a url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binding {
    /// Trigger text, matched case-insensitively.
    #[serde(rename = "Keyword", alias = "keyword")]
    pub keyword: String,

    #[serde(rename = "Title", alias = "title", deserialize_with = "trimmed")]
    pub title: String,

    /// Absolute url with optional `{0}`..`{n}` placeholders.
    #[serde(rename = "Url", alias = "url", deserialize_with = "trimmed")]
    pub url_template: String,

    /// Separates keyword from arguments. A single space switches to whitespace splitting.
    #[serde(rename = "Delimiter", alias = "delimiter", deserialize_with = "delimiter_or_default")]
    pub delimiter: String,

    #[serde(rename = "IconPath", alias = "iconPath", deserialize_with = "trimmed")]
    pub icon_path: String,

    #[serde(rename = "AddToBulkOpenUrls", alias = "addToBulkOpenUrls")]
    pub include_in_bulk_open: bool,
}

impl Default for Binding {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            title: String::new(),
            url_template: String::new(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            icon_path: String::new(),
            include_in_bulk_open: false,
        }
    }
}

impl Binding {
    /// Title and url are trimmed the same way they are when loaded from disk.
    pub fn new(keyword: impl Into<String>, title: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            title: title.into().trim().to_string(),
            url_template: url_template.into().trim().to_string(),
            ..Default::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_icon(mut self, icon_path: impl Into<String>) -> Self {
        self.icon_path = icon_path.into().trim().to_string();
        self
    }

    pub fn in_bulk_open(mut self, include: bool) -> Self {
        self.include_in_bulk_open = include;
        self
    }

    /// Checks that the binding can take part in matching.
    pub fn validate(&self) -> Result<(), LinkError> {
        if self.keyword.trim().is_empty() {
            return Err(LinkError::InvalidBinding(format!("{:?} has no keyword", self.url_template)));
        }
        if self.url_template.trim().is_empty() {
            return Err(LinkError::InvalidBinding(format!("keyword {:?} has no url", self.keyword)));
        }
        Ok(())
    }

    /// Only bindings with a keyword and a url take part in matching.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// True for rows the settings editor left untouched; these are never persisted.
    pub fn is_blank(&self) -> bool {
        self.keyword.trim().is_empty()
            && self.title.trim().is_empty()
            && self.url_template.trim().is_empty()
            && self.icon_path.trim().is_empty()
    }

    /// The delimiter in effect, an empty one falls back to a space.
    pub fn effective_delimiter(&self) -> &str {
        if self.delimiter.is_empty() {
            " "
        } else {
            &self.delimiter
        }
    }

    pub fn splits_on_whitespace(&self) -> bool {
        self.effective_delimiter() == " "
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.keyword, self.title)
    }
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
    where D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()).unwrap_or_default())
}

fn delimiter_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
    where D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_else(|| DEFAULT_DELIMITER.to_string()))
}

type ChangeHook = Arc<dyn Fn(&[Binding]) + Send + Sync>;

/// The live, ordered binding list shared between the settings side and queries.
///
/// Clones share the same list. Every mutation is visible to the next query and
/// fires the registered change hooks once the write lock is released.
#[derive(Clone, Default)]
pub struct Bindings {
    items: Arc<RwLock<Vec<Binding>>>,
    hooks: Arc<Mutex<Vec<ChangeHook>>>,
    // serializes notifications, so the last hook call always sees the final list
    notify: Arc<ReentrantMutex<()>>,
}

impl Bindings {
    pub fn new(items: Vec<Binding>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
            hooks: Default::default(),
            notify: Default::default(),
        }
    }

    /// Registers a callback invoked after every change, e.g. to persist the list.
    ///
    /// Hooks run one notification at a time, with no lock on the list held. A
    /// hook may mutate the list or register further hooks; a mutation made from
    /// inside a hook notifies again, nested in the current call.
    pub fn on_change(&self, hook: impl Fn(&[Binding]) + Send + Sync + 'static) {
        self.hooks.lock().push(Arc::new(hook));
    }

    /// Runs `f` against a consistent view of the list.
    pub fn read<R>(&self, f: impl FnOnce(&[Binding]) -> R) -> R {
        f(&self.items.read())
    }

    pub fn snapshot(&self) -> Vec<Binding> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn push(&self, binding: Binding) {
        self.items.write().push(binding);
        self.notify_changed();
    }

    pub fn remove(&self, index: usize) -> Option<Binding> {
        let removed = {
            let mut items = self.items.write();
            (index < items.len()).then(|| items.remove(index))
        };

        if removed.is_some() {
            self.notify_changed();
        }

        removed
    }

    /// Removes every binding whose keyword equals `keyword`, ignoring case.
    pub fn remove_keyword(&self, keyword: &str) -> usize {
        let keyword = keyword.trim().to_lowercase();

        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|b| b.keyword.trim().to_lowercase() != keyword);
            before - items.len()
        };

        if removed > 0 {
            self.notify_changed();
        }

        removed
    }

    /// Edits the binding at `index` in place. Returns false if there is none.
    pub fn update(&self, index: usize, edit: impl FnOnce(&mut Binding)) -> bool {
        let updated = match self.items.write().get_mut(index) {
            Some(binding) => {
                edit(binding);
                true
            }
            None => false,
        };

        if updated {
            self.notify_changed();
        }

        updated
    }

    /// The settings-changed hook. Mutating methods call this themselves.
    pub fn notify_changed(&self) {
        let _serial = self.notify.lock();

        let items = self.snapshot();
        let hooks = self.hooks.lock().clone();

        for hook in hooks {
            hook(&items);
        }
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.read().iter()).finish()
    }
}
