use super::theme::OneDark;
use termimad::MadSkin;

pub struct Renderer {
    skin: MadSkin,
    error_skin: MadSkin,
    use_color: bool,
}

impl Renderer {
    pub fn new(use_color: bool) -> Self {
        Self {
            skin: OneDark::default_onedark_skin(),
            error_skin: OneDark::error_skin(),
            use_color,
        }
    }

    /// Plain result values (paths, sums, durations) stay unstyled so they can be piped.
    pub fn print_value(&self, value: &str) {
        println!("{value}");
    }

    pub fn print_info(&self, message: &str) {
        if self.use_color {
            self.skin.print_inline(&format!("*{message}*\n"));
        } else {
            println!("{message}");
        }
    }

    /// Errors go to stderr.
    pub fn print_error(&self, message: &str) {
        if self.use_color {
            eprint!(
                "{}",
                self.error_skin
                    .term_text(&format!("**daybook:** {message}"))
            );
        } else {
            eprintln!("daybook: {message}");
        }
    }
}
