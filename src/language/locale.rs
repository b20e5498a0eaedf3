//! Document-level locale and the language selector view state
//!
//! Both are plain owned values: the manager mutates them, the views read them.

/// Text direction of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// The two document-wide attributes: `lang` and `dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocale {
    pub lang: String,
    pub dir: TextDirection,
}

impl DocumentLocale {
    /// Locale for `lang`: right-to-left unless it is the LTR language
    pub fn for_language(lang: &str, ltr_language: &str) -> Self {
        Self {
            lang: lang.to_string(),
            dir: if lang == ltr_language {
                TextDirection::Ltr
            } else {
                TextDirection::Rtl
            },
        }
    }
}

/// One entry of the language dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: String,
    pub label: String,
    pub selected: bool,
}

/// Button label plus the option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSelector {
    pub button_label: String,
    pub options: Vec<LanguageOption>,
}

impl LanguageSelector {
    pub fn new(options: impl IntoIterator<Item = (String, String)>) -> Self {
        let options = options
            .into_iter()
            .map(|(code, label)| LanguageOption {
                code,
                label,
                selected: false,
            })
            .collect();
        Self {
            button_label: String::new(),
            options,
        }
    }

    /// Mark `code` as the selected option and mirror its label on the button
    ///
    /// Codes without an option leave the button label alone.
    pub fn mark_selected(&mut self, code: &str) {
        for option in &mut self.options {
            option.selected = option.code == code;
        }
        if let Some(option) = self.options.iter().find(|o| o.code == code) {
            self.button_label = option.label.clone();
        }
    }

    /// Position of the selected option in menu order
    pub fn selected_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.selected)
    }
}
