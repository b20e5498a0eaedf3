// Device detection - best-guess panel from agent/platform signals
//
// Pure and synchronous: the same signals always produce the same result.
// Rules are evaluated in a fixed order (iOS, Android, Windows, Mac) and the
// first match wins, because the substrings overlap: an iPad agent mentions
// "Mac OS X", and Chrome on every platform carries a "Safari" token.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Panel keys known to the detector (must match the guide catalog)
pub const IPHONE_SAFARI: &str = "iphone-safari";
pub const ANDROID_CHROME: &str = "android-chrome";
pub const WINDOWS_CHROME: &str = "windows-chrome";
pub const MAC: &str = "mac";

/// Key used when nothing matched
pub const FALLBACK_KEY: &str = ANDROID_CHROME;

/// Raw signals the detector inspects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentSignals {
    /// Browser agent string (e.g. "Mozilla/5.0 (iPhone; ...)")
    pub user_agent: String,
    /// Platform string (e.g. "MacIntel", "Win32")
    pub platform: String,
}

impl AgentSignals {
    pub fn new(user_agent: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            platform: platform.into(),
        }
    }

    /// Synthesize signals for the machine we are running on
    ///
    /// Terminals have no agent string, so only the platform half is filled in
    /// for desktop systems. Mobile targets get a minimal agent signature.
    pub fn from_host() -> Self {
        match std::env::consts::OS {
            "macos" => Self::new("", "MacIntel"),
            "windows" => Self::new("", "Win32"),
            "ios" => Self::new("Mozilla/5.0 (iPhone; CPU iPhone OS like Mac OS X)", "iPhone"),
            "android" => Self::new("Mozilla/5.0 (Linux; Android)", "Linux armv8l"),
            other => Self::new("", other),
        }
    }
}

/// Outcome of detection: which panel to open and what to tell the visitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub key: &'static str,
    pub label: &'static str,
}

/// Compiled signature patterns (case-insensitive)
struct Signatures {
    ios: Regex,
    android: Regex,
    mac_platform: Regex,
    mac_agent: Regex,
    windows_platform: Regex,
    windows_agent: Regex,
    safari: Regex,
    not_safari: Regex,
    chrome_like: Regex,
    edge: Regex,
}

static SIGNATURES: LazyLock<Signatures> = LazyLock::new(|| {
    let re = |pattern: &str| {
        Regex::new(&format!("(?i){pattern}")).expect("signature patterns are static literals")
    };
    Signatures {
        ios: re("iPhone|iPad|iPod"),
        android: re("Android"),
        mac_platform: re("Mac"),
        mac_agent: re("Mac OS X"),
        windows_platform: re("Win"),
        windows_agent: re("Windows"),
        safari: re("Safari"),
        not_safari: re("Chrome|CriOS|Edg|OPR"),
        chrome_like: re("Chrome|CriOS"),
        edge: re("Edg"),
    }
});

mod labels {
    pub const UNKNOWN: &str = "غير معروف — اختر التاب المناسب";
    pub const IPHONE_SAFARI: &str = "تم التعرف: آيفون — Safari";
    pub const IPHONE_OTHER: &str = "تم التعرف: آيفون — يُفضّل Safari";
    pub const ANDROID_CHROME: &str = "تم التعرف: أندرويد — Chrome";
    pub const ANDROID_OTHER: &str = "تم التعرف: أندرويد — افتحها في Chrome";
    pub const WINDOWS_EDGE: &str = "تم التعرف: ويندوز — Edge";
    pub const WINDOWS_OTHER: &str = "تم التعرف: ويندوز — Chrome / Edge";
    pub const MAC_SAFARI: &str = "تم التعرف: ماك — Safari";
    pub const MAC_OTHER: &str = "تم التعرف: ماك — Safari / Chrome";
}

/// Detect the best panel for the given signals
pub fn detect(signals: &AgentSignals) -> DetectionResult {
    let sig = &*SIGNATURES;
    let ua = signals.user_agent.as_str();
    let platform = signals.platform.as_str();

    let is_ios = sig.ios.is_match(ua);
    let is_android = sig.android.is_match(ua);
    let is_windows = sig.windows_platform.is_match(platform) || sig.windows_agent.is_match(ua);
    let is_mac = sig.mac_platform.is_match(platform) || sig.mac_agent.is_match(ua);

    // Chromium derivatives and Opera embed a Safari token, so exclude them
    let is_safari = sig.safari.is_match(ua) && !sig.not_safari.is_match(ua);
    let is_chrome_like = sig.chrome_like.is_match(ua);
    let is_edge = sig.edge.is_match(ua);

    let (key, label) = if is_ios {
        let label = if is_safari {
            labels::IPHONE_SAFARI
        } else {
            labels::IPHONE_OTHER
        };
        (IPHONE_SAFARI, label)
    } else if is_android {
        let label = if is_chrome_like {
            labels::ANDROID_CHROME
        } else {
            labels::ANDROID_OTHER
        };
        (ANDROID_CHROME, label)
    } else if is_windows {
        let label = if is_edge {
            labels::WINDOWS_EDGE
        } else {
            labels::WINDOWS_OTHER
        };
        (WINDOWS_CHROME, label)
    } else if is_mac {
        let label = if is_safari {
            labels::MAC_SAFARI
        } else {
            labels::MAC_OTHER
        };
        (MAC, label)
    } else {
        (FALLBACK_KEY, labels::UNKNOWN)
    };

    tracing::debug!(key, label, "Device detection finished");
    DetectionResult { key, label }
}
