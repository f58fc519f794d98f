use termimad::{
    MadSkin,
    crossterm::style::{Attribute, Color},
};

pub struct OneDark;

impl OneDark {
    pub fn default_onedark_skin() -> MadSkin {
        let mut skin = MadSkin::default();

        skin.paragraph.set_fg(OneDark::FG);
        skin.bold.set_fg(OneDark::YELLOW);
        skin.italic.set_fg(OneDark::COMMENT);

        skin.headers[0].set_fg(OneDark::RED);
        skin.headers[0].add_attr(Attribute::Bold);

        skin.table.set_fg(OneDark::PURPLE);
        skin.bullet.set_fg(OneDark::RED);
        skin.inline_code.set_fg(OneDark::GREEN);
        skin.inline_code.set_bg(OneDark::BG);

        skin
    }

    /// Same palette, errors in red.
    pub fn error_skin() -> MadSkin {
        let mut skin = Self::default_onedark_skin();
        skin.paragraph.set_fg(OneDark::RED);
        skin.bold.set_fg(OneDark::RED);
        skin
    }

    pub const BG: Color = Color::Rgb {
        r: 0x28,
        g: 0x2C,
        b: 0x34,
    }; // #282C34
    pub const FG: Color = Color::Rgb {
        r: 0xAB,
        g: 0xB2,
        b: 0xBF,
    }; // #ABB2BF
    pub const RED: Color = Color::Rgb {
        r: 0xE0,
        g: 0x6C,
        b: 0x75,
    }; // #E06C75
    pub const YELLOW: Color = Color::Rgb {
        r: 0xE5,
        g: 0xC0,
        b: 0x7B,
    }; // #E5C07B
    pub const GREEN: Color = Color::Rgb {
        r: 0x98,
        g: 0xC3,
        b: 0x79,
    }; // #98C379
    pub const PURPLE: Color = Color::Rgb {
        r: 0xC6,
        g: 0x78,
        b: 0xDD,
    }; // #C678DD
    pub const COMMENT: Color = Color::Rgb {
        r: 0x5C,
        g: 0x63,
        b: 0x70,
    }; // #5C6370
}
