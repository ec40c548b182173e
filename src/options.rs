//! Editor options consumed by the element generators.

use serde::Deserialize;

use crate::freezable::{CloneMutable, Freezable, FreezeState, FrozenMutationError, check_mutable};

/// Errors that can occur when building an options snapshot.
#[derive(Debug)]
pub enum OptionsError {
    /// A setter was called on a frozen snapshot.
    Frozen(FrozenMutationError),
    /// The TOML source could not be parsed.
    Parse(toml::de::Error),
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frozen(e) => write!(f, "{}", e),
            Self::Parse(e) => write!(f, "invalid options: {}", e),
        }
    }
}

impl std::error::Error for OptionsError {}

impl From<FrozenMutationError> for OptionsError {
    fn from(e: FrozenMutationError) -> Self {
        Self::Frozen(e)
    }
}

impl From<toml::de::Error> for OptionsError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

/// Options that affect how visual lines are generated.
///
/// The editor owns one live instance. Rendering passes read a frozen snapshot of
/// it and never write back.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct TextEditorOptions {
    enable_hyperlinks: bool,
    enable_email_hyperlinks: bool,
    require_control_for_hyperlink_click: bool,
    #[serde(skip)]
    state: FreezeState,
}

impl Default for TextEditorOptions {
    fn default() -> Self {
        Self {
            enable_hyperlinks: true,
            enable_email_hyperlinks: true,
            require_control_for_hyperlink_click: true,
            state: FreezeState::default(),
        }
    }
}

impl TextEditorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a TOML snippet. Missing keys keep their defaults and
    /// the result is still mutable.
    ///
    /// ```toml
    /// enable-email-hyperlinks = false
    /// require-control-for-hyperlink-click = false
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, OptionsError> {
        let options = toml::from_str::<TextEditorOptions>(s)?;
        log::debug!("Parsed editor options: {:?}", options);
        Ok(options)
    }

    /// Whether bare URLs in the text become clickable links.
    pub fn enable_hyperlinks(&self) -> bool {
        self.enable_hyperlinks
    }

    /// Whether e-mail addresses in the text become clickable `mailto:` links.
    pub fn enable_email_hyperlinks(&self) -> bool {
        self.enable_email_hyperlinks
    }

    /// Whether a click on a link must hold Control to navigate.
    pub fn require_control_for_hyperlink_click(&self) -> bool {
        self.require_control_for_hyperlink_click
    }

    pub fn set_enable_hyperlinks(&mut self, value: bool) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.enable_hyperlinks = value;
        Ok(())
    }

    pub fn set_enable_email_hyperlinks(&mut self, value: bool) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.enable_email_hyperlinks = value;
        Ok(())
    }

    pub fn set_require_control_for_hyperlink_click(
        &mut self,
        value: bool,
    ) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.require_control_for_hyperlink_click = value;
        Ok(())
    }
}

impl Freezable for TextEditorOptions {
    fn is_frozen(&self) -> bool {
        self.state.is_frozen()
    }

    fn freeze_core(&mut self) {
        self.state.set_frozen();
    }
}

impl CloneMutable for TextEditorOptions {
    fn clone_mutable(&self) -> Self {
        self.clone()
    }
}

crate::freezable_capability!(TextEditorOptions);
