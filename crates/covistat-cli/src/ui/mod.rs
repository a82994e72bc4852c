pub use self::chart::*;

mod chart;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);

    /// Colours assigned to outcomes, in outcome order.
    pub const PALETTE: [Color; 7] = [CYAN, ORANGE, GREEN, RED, BLUE, YELLOW, MAGENTA];
}
