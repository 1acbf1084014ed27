use crate::commands::keyboard::KeyBinding;
use serde::Deserialize;
use std::{fs, io, path::Path};

#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The default configuration for the deck.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// The scrolling behavior.
    #[serde(default)]
    pub scrolling: ScrollingConfig,

    #[serde(default)]
    pub bindings: KeyBindingsConfig,
}

impl Config {
    /// Load the config from a path.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ConfigLoadError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("config file not found")]
    NotFound,

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// The theme to use unless overridden on the command line.
    pub theme: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct ScrollingConfig {
    /// The total duration of a slide scroll animation, in milliseconds.
    #[serde(default = "default_scroll_duration_millis")]
    pub duration_millis: u64,

    /// The maximum number of frames in a slide scroll animation.
    #[serde(default = "default_scroll_frames")]
    pub frames: usize,

    /// The number of rows a single mouse wheel notch scrolls.
    #[serde(default = "default_wheel_rows")]
    pub wheel_rows: u16,

    /// How long to wait after the last wheel movement before snapping to the nearest slide, in
    /// milliseconds.
    #[serde(default = "default_snap_delay_millis")]
    pub snap_delay_millis: u64,
}

impl Default for ScrollingConfig {
    fn default() -> Self {
        Self {
            duration_millis: default_scroll_duration_millis(),
            frames: default_scroll_frames(),
            wheel_rows: default_wheel_rows(),
            snap_delay_millis: default_snap_delay_millis(),
        }
    }
}

fn default_scroll_duration_millis() -> u64 {
    200
}

fn default_scroll_frames() -> usize {
    30
}

fn default_wheel_rows() -> u16 {
    3
}

fn default_snap_delay_millis() -> u64 {
    250
}

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct KeyBindingsConfig {
    /// The keys that move the deck to the next slide.
    #[serde(default = "default_next_bindings")]
    pub(crate) next: Vec<KeyBinding>,

    /// The keys that move the deck to the previous slide.
    #[serde(default = "default_previous_bindings")]
    pub(crate) previous: Vec<KeyBinding>,

    /// The key binding to jump to the first slide.
    #[serde(default = "default_first_slide_bindings")]
    pub(crate) first_slide: Vec<KeyBinding>,

    /// The key binding to jump to the last slide.
    #[serde(default = "default_last_slide_bindings")]
    pub(crate) last_slide: Vec<KeyBinding>,

    /// The key binding to jump to a specific slide.
    #[serde(default = "default_go_to_slide_bindings")]
    pub(crate) go_to_slide: Vec<KeyBinding>,

    /// The key binding to toggle the slide index modal.
    #[serde(default = "default_toggle_index_bindings")]
    pub(crate) toggle_slide_index: Vec<KeyBinding>,

    /// The key binding to toggle the key bindings modal.
    #[serde(default = "default_toggle_bindings_modal_bindings")]
    pub(crate) toggle_bindings: Vec<KeyBinding>,

    /// The key binding to close the currently open modal.
    #[serde(default = "default_close_modal_bindings")]
    pub(crate) close_modal: Vec<KeyBinding>,

    /// The key binding to close the application.
    #[serde(default = "default_exit_bindings")]
    pub(crate) exit: Vec<KeyBinding>,

    /// The key binding to suspend the application.
    #[serde(default = "default_suspend_bindings")]
    pub(crate) suspend: Vec<KeyBinding>,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            next: default_next_bindings(),
            previous: default_previous_bindings(),
            first_slide: default_first_slide_bindings(),
            last_slide: default_last_slide_bindings(),
            go_to_slide: default_go_to_slide_bindings(),
            toggle_slide_index: default_toggle_index_bindings(),
            toggle_bindings: default_toggle_bindings_modal_bindings(),
            close_modal: default_close_modal_bindings(),
            exit: default_exit_bindings(),
            suspend: default_suspend_bindings(),
        }
    }
}

fn make_keybindings<const N: usize>(raw_bindings: [&str; N]) -> Vec<KeyBinding> {
    let mut bindings = Vec::new();
    for binding in raw_bindings {
        bindings.push(binding.parse().expect("invalid binding"));
    }
    bindings
}

fn default_next_bindings() -> Vec<KeyBinding> {
    make_keybindings(["l", "j", "<right>", "<page_down>", "<space>"])
}

fn default_previous_bindings() -> Vec<KeyBinding> {
    make_keybindings(["h", "k", "<left>", "<page_up>"])
}

fn default_first_slide_bindings() -> Vec<KeyBinding> {
    make_keybindings(["gg", "<home>"])
}

fn default_last_slide_bindings() -> Vec<KeyBinding> {
    make_keybindings(["G", "<end>"])
}

fn default_go_to_slide_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<number>G"])
}

fn default_toggle_index_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<c-p>"])
}

fn default_toggle_bindings_modal_bindings() -> Vec<KeyBinding> {
    make_keybindings(["?"])
}

fn default_close_modal_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<esc>"])
}

fn default_exit_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<c-c>", "q"])
}

fn default_suspend_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<c-z>"])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commands::keyboard::CommandKeyBindings;
    use tempfile::tempdir;

    #[test]
    fn default_bindings() {
        let config = KeyBindingsConfig::default();
        CommandKeyBindings::try_from(config).expect("construction failed");
    }

    #[test]
    fn partial_config() {
        let config: Config = serde_yaml::from_str("scrolling:\n  wheel_rows: 5\n").expect("failed to parse");
        assert_eq!(config.scrolling.wheel_rows, 5);
        assert_eq!(config.scrolling.frames, default_scroll_frames());
        assert_eq!(config.scrolling.duration_millis, default_scroll_duration_millis());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_yaml::from_str::<Config>("potato: true\n");
        assert!(result.is_err(), "not an error");
    }

    #[test]
    fn load_config_file() {
        let directory = tempdir().expect("creating tempdir");
        let path = directory.path().join("config.yaml");
        fs::write(&path, "defaults:\n  theme: light\n").expect("writing config");
        let config = Config::load(&path).expect("loading failed");
        assert_eq!(config.defaults.theme.as_deref(), Some("light"));
    }

    #[test]
    fn load_missing_config_file() {
        let err = Config::load(Path::new("/tmp/pitchterm/4a1b663ad4e0e0bd9152bc4ba00ba9dd.yaml"))
            .expect_err("loading succeeded");
        assert!(matches!(err, ConfigLoadError::NotFound), "unexpected error: {err:?}");
    }
}
