// Guide catalog - the static tab/panel pairing shown by the UI
//
// Each entry is one tab in the strip and the panel it controls. Content is
// authored in the native language and in the one translated language the
// translation widget is allowed to offer.

use crate::detect;

/// Localized panel content
#[derive(Debug, Clone, Copy)]
pub struct PanelContent {
    pub tab_title: &'static str,
    pub heading: &'static str,
    pub steps: &'static [&'static str],
}

/// One tab/panel pair
#[derive(Debug, Clone, Copy)]
pub struct GuideEntry {
    pub key: &'static str,
    pub native: PanelContent,
    pub translated: PanelContent,
}

const ENTRIES: [GuideEntry; 4] = [
    GuideEntry {
        key: detect::IPHONE_SAFARI,
        native: PanelContent {
            tab_title: "آيفون — Safari",
            heading: "إضافة التطبيق إلى الشاشة الرئيسية في آيفون",
            steps: &[
                "افتح الرابط في متصفح Safari.",
                "اضغط على زر المشاركة أسفل الشاشة.",
                "اختر «إضافة إلى الشاشة الرئيسية».",
                "اضغط «إضافة» لتأكيد التثبيت.",
            ],
        },
        translated: PanelContent {
            tab_title: "iPhone — Safari",
            heading: "Add the app to your iPhone home screen",
            steps: &[
                "Open the link in Safari.",
                "Tap the Share button at the bottom of the screen.",
                "Choose \"Add to Home Screen\".",
                "Tap \"Add\" to confirm.",
            ],
        },
    },
    GuideEntry {
        key: detect::ANDROID_CHROME,
        native: PanelContent {
            tab_title: "أندرويد — Chrome",
            heading: "تثبيت التطبيق على أندرويد",
            steps: &[
                "افتح الرابط في متصفح Chrome.",
                "اضغط على قائمة النقاط الثلاث في الأعلى.",
                "اختر «تثبيت التطبيق» أو «إضافة إلى الشاشة الرئيسية».",
                "وافق على رسالة التأكيد.",
            ],
        },
        translated: PanelContent {
            tab_title: "Android — Chrome",
            heading: "Install the app on Android",
            steps: &[
                "Open the link in Chrome.",
                "Tap the three-dot menu at the top.",
                "Choose \"Install app\" or \"Add to Home screen\".",
                "Accept the confirmation prompt.",
            ],
        },
    },
    GuideEntry {
        key: detect::WINDOWS_CHROME,
        native: PanelContent {
            tab_title: "ويندوز — Chrome / Edge",
            heading: "تثبيت التطبيق على ويندوز",
            steps: &[
                "افتح الرابط في Chrome أو Edge.",
                "اضغط على أيقونة التثبيت في شريط العنوان.",
                "اختر «تثبيت».",
                "سيظهر التطبيق في قائمة ابدأ.",
            ],
        },
        translated: PanelContent {
            tab_title: "Windows — Chrome / Edge",
            heading: "Install the app on Windows",
            steps: &[
                "Open the link in Chrome or Edge.",
                "Click the install icon in the address bar.",
                "Choose \"Install\".",
                "The app appears in the Start menu.",
            ],
        },
    },
    GuideEntry {
        key: detect::MAC,
        native: PanelContent {
            tab_title: "ماك",
            heading: "إضافة التطبيق على ماك",
            steps: &[
                "في Safari: من قائمة «ملف» اختر «إضافة إلى Dock».",
                "في Chrome: اضغط أيقونة التثبيت في شريط العنوان.",
                "أكد الإضافة.",
                "شغّل التطبيق من Dock أو Launchpad.",
            ],
        },
        translated: PanelContent {
            tab_title: "Mac",
            heading: "Add the app on a Mac",
            steps: &[
                "In Safari: choose File > Add to Dock.",
                "In Chrome: click the install icon in the address bar.",
                "Confirm the prompt.",
                "Launch the app from the Dock or Launchpad.",
            ],
        },
    },
];

/// All entries in tab-strip order
pub fn entries() -> &'static [GuideEntry] {
    &ENTRIES
}

/// Keys in tab-strip order
pub fn keys() -> impl Iterator<Item = &'static str> + Clone {
    entries().iter().map(|e| e.key)
}

/// Content for a panel in the given language
///
/// `translated` is `true` once the translation widget has applied a
/// non-native language; anything else renders the native text.
pub fn content(key: &str, translated: bool) -> Option<&'static PanelContent> {
    let entry = entries().iter().find(|e| e.key == key)?;
    Some(if translated {
        &entry.translated
    } else {
        &entry.native
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_detector_keys() {
        for key in [
            detect::IPHONE_SAFARI,
            detect::ANDROID_CHROME,
            detect::WINDOWS_CHROME,
            detect::MAC,
            detect::FALLBACK_KEY,
        ] {
            assert!(content(key, false).is_some(), "missing panel for {key}");
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = keys().collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), entries().len());
    }

    #[test]
    fn test_content_language_switch() {
        let native = content(detect::MAC, false).unwrap();
        let translated = content(detect::MAC, true).unwrap();
        assert_eq!(translated.tab_title, "Mac");
        assert_ne!(native.heading, translated.heading);
        assert!(content("linux", false).is_none());
    }
}
