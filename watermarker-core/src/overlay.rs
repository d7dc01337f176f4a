use clap::ValueEnum;

/// Kind of watermark applied to a video
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OverlayKind {
    /// Static image watermark
    #[value(alias = "l")]
    Logo,
    /// Scrolling text watermark
    #[value(alias = "m")]
    Marquee,
}

impl OverlayKind {
    /// Kind used when the wizard prompt is left empty
    pub const DEFAULT: OverlayKind = OverlayKind::Logo;

    /// Parse an exact token (`logo`, `l`, `marquee`, `m`)
    pub fn from_token(token: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(token, false).ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            OverlayKind::Logo => "logo",
            OverlayKind::Marquee => "marquee",
        }
    }

    /// Name of the configuration section holding this kind's settings
    pub fn section(&self) -> &'static str {
        match self {
            OverlayKind::Logo => "Logo",
            OverlayKind::Marquee => "Marquee",
        }
    }
}

/// Where the watermark sits on the frame and how opaque it is
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    /// VLC anchor code: 0 centre, 1 left, 2 right, 4 top, 8 bottom (sums for corners)
    pub position: i32,
    pub opacity: u8,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 20,
            y: 20,
            position: 10,
            opacity: 255,
        }
    }
}

/// Content specific to each overlay kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayContent {
    Marquee {
        text: String,
        size: u32,
        color: String,
    },
    Logo {
        /// Image path relative to the logos directory
        file_name: String,
    },
}

/// A complete watermark description: content plus placement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    pub placement: Placement,
    pub content: OverlayContent,
}

impl Overlay {
    pub const DEFAULT_MARQUEE_SIZE: u32 = 30;
    pub const DEFAULT_MARQUEE_COLOR: &'static str = "0xFFFFFF";

    pub fn marquee(text: impl Into<String>, size: u32, color: impl Into<String>) -> Self {
        Self {
            placement: Placement::default(),
            content: OverlayContent::Marquee {
                text: text.into(),
                size,
                color: color.into(),
            },
        }
    }

    pub fn logo(file_name: impl Into<String>) -> Self {
        Self {
            placement: Placement::default(),
            content: OverlayContent::Logo {
                file_name: file_name.into(),
            },
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn kind(&self) -> OverlayKind {
        match self.content {
            OverlayContent::Marquee { .. } => OverlayKind::Marquee,
            OverlayContent::Logo { .. } => OverlayKind::Logo,
        }
    }
}
