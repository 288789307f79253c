use crate::{CookieStore, StorageError};

/// Where the drawing manager writes its document.
#[derive(Default)]
pub enum SaveHandler {
    /// Caller supplied write function.
    Callback(Box<dyn FnMut(&str)>),
    /// The built-in cookie store.
    Cookie(CookieStore),
    /// Nothing configured: saving logs a warning and does no I/O.
    #[default]
    None,
}

impl SaveHandler {
    pub fn callback(f: impl FnMut(&str) + 'static) -> Self {
        Self::Callback(Box::new(f))
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Hand the document to the configured handler.
    ///
    /// Returns false when no handler is configured.
    pub fn save(&mut self, json: &str) -> bool {
        match self {
            Self::Callback(f) => {
                f(json);
                true
            }
            Self::Cookie(store) => {
                store.save(json);
                true
            }
            Self::None => {
                log::warn!("No handler to save shapes: {}", json);
                false
            }
        }
    }
}

/// Where the drawing manager reads its document from.
#[derive(Default)]
pub enum LoadHandler {
    /// Caller supplied read function. `None` means nothing is stored yet.
    Callback(Box<dyn FnMut() -> Option<String>>),
    /// The built-in cookie store.
    Cookie(CookieStore),
    /// Nothing configured: loading logs a warning and does no I/O.
    #[default]
    None,
}

impl LoadHandler {
    pub fn callback(f: impl FnMut() -> Option<String> + 'static) -> Self {
        Self::Callback(Box::new(f))
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Fetch the stored document, if any.
    pub fn load(&mut self) -> Result<Option<String>, StorageError> {
        match self {
            Self::Callback(f) => Ok(f()),
            Self::Cookie(store) => store.load(),
            Self::None => {
                log::warn!("No handler to load shapes");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for SaveHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("SaveHandler::Callback"),
            Self::Cookie(store) => f.debug_tuple("SaveHandler::Cookie").field(store).finish(),
            Self::None => f.write_str("SaveHandler::None"),
        }
    }
}

impl std::fmt::Debug for LoadHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("LoadHandler::Callback"),
            Self::Cookie(store) => f.debug_tuple("LoadHandler::Cookie").field(store).finish(),
            Self::None => f.write_str("LoadHandler::None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_callback_receives_document() {
        let saved = Rc::new(RefCell::new(Vec::new()));
        let sink = saved.clone();
        let mut handler =
            SaveHandler::callback(move |json| sink.borrow_mut().push(json.to_string()));

        assert!(handler.save("{\"shapes\":[]}"));
        assert_eq!(saved.borrow().as_slice(), ["{\"shapes\":[]}"]);
    }

    #[test]
    fn test_missing_handlers_do_nothing() {
        let mut save = SaveHandler::default();
        assert!(!save.is_configured());
        assert!(!save.save("{}"));

        let mut load = LoadHandler::default();
        assert_eq!(load.load(), Ok(None));
    }

    #[test]
    fn test_cookie_handlers_share_store() {
        let (store, _jar) = CookieStore::in_memory();
        let mut save = SaveHandler::Cookie(store.clone());
        let mut load = LoadHandler::Cookie(store);

        save.save("{\"shapes\":[]}");
        assert_eq!(load.load(), Ok(Some("{\"shapes\":[]}".to_string())));
    }

    #[test]
    fn test_load_callback() {
        let mut load = LoadHandler::callback(|| Some("{}".to_string()));
        assert!(load.is_configured());
        assert_eq!(load.load(), Ok(Some("{}".to_string())));
    }
}
