use crate::math::{Rect, Vec2};
use crate::render::TextureHandle;

/// Vertical shrink applied to a solid tile's drawn rectangle to get its hitbox.
pub const TILE_HITBOX_SHRINK: f32 = 10.0;

/// Which map layer a tile came from. Decides its roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    Floor,
    /// Solid but never drawn.
    Invisible,
    Grass,
    Object,
    Door,
    Wall,
}

impl TileKind {
    /// Classify a tile layer by name. Unknown names yield `None`.
    pub fn from_layer_name(name: &str) -> Option<Self> {
        match name {
            "floor" => Some(TileKind::Floor),
            "invisible" => Some(TileKind::Invisible),
            "grass" => Some(TileKind::Grass),
            "objects" => Some(TileKind::Object),
            "door" => Some(TileKind::Door),
            "wall" => Some(TileKind::Wall),
            _ => None,
        }
    }

    pub fn is_solid(self) -> bool {
        !matches!(self, TileKind::Floor)
    }
}

/// One static world cell. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    kind: TileKind,
    rect: Rect,
    hitbox: Option<Rect>,
    image: Option<TextureHandle>,
    destination: Option<String>,
}

impl Tile {
    /// Create a tile with its top-left corner at `position`.
    ///
    /// Invisible tiles drop their image; floor tiles get no hitbox.
    pub fn new(kind: TileKind, position: Vec2, tile_size: f32, image: Option<TextureHandle>) -> Self {
        let rect = Rect::from_top_left(position, Vec2::new(tile_size, tile_size));
        let hitbox = kind
            .is_solid()
            .then(|| rect.inflate(0.0, -TILE_HITBOX_SHRINK));
        let image = if kind == TileKind::Invisible { None } else { image };
        Self {
            kind,
            rect,
            hitbox,
            image,
            destination: None,
        }
    }

    /// Attach the map this door leads to. Ignored for non-door tiles.
    #[must_use]
    pub fn with_destination(mut self, destination: Option<String>) -> Self {
        if self.kind == TileKind::Door {
            self.destination = destination;
        }
        self
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.rect.top_left()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn hitbox(&self) -> Option<Rect> {
        self.hitbox
    }

    pub fn image(&self) -> Option<TextureHandle> {
        self.image
    }

    /// Destination map of a door, if one was resolved.
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Takes part in collision.
    pub fn is_obstacle(&self) -> bool {
        self.hitbox.is_some()
    }

    pub fn is_door(&self) -> bool {
        self.kind == TileKind::Door
    }

    /// Drawn by the depth-sorted entity pass.
    pub fn is_renderable(&self) -> bool {
        self.image.is_some() && self.kind != TileKind::Floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_follow_layer_kind() {
        let image = Some(TextureHandle::new(3));
        let at = Vec2::new(64.0, 128.0);

        let wall = Tile::new(TileKind::Wall, at, 64.0, image);
        assert!(wall.is_obstacle() && wall.is_renderable() && !wall.is_door());

        let invisible = Tile::new(TileKind::Invisible, at, 64.0, image);
        assert!(invisible.is_obstacle());
        assert!(!invisible.is_renderable());
        assert_eq!(invisible.image(), None);

        let floor = Tile::new(TileKind::Floor, at, 64.0, image);
        assert!(!floor.is_obstacle() && !floor.is_renderable());
    }

    #[test]
    fn hitbox_is_vertically_shrunk_rect() {
        let tile = Tile::new(TileKind::Grass, Vec2::new(0.0, 64.0), 64.0, None);
        assert_eq!(tile.hitbox(), Some(Rect::new(0.0, 69.0, 64.0, 54.0)));
        assert_eq!(tile.rect(), Rect::new(0.0, 64.0, 64.0, 64.0));
    }

    #[test]
    fn destinations_only_stick_to_doors() {
        let door = Tile::new(TileKind::Door, Vec2::ZERO, 64.0, None)
            .with_destination(Some("forest.tmj".into()));
        assert_eq!(door.destination(), Some("forest.tmj"));

        let wall = Tile::new(TileKind::Wall, Vec2::ZERO, 64.0, None)
            .with_destination(Some("forest.tmj".into()));
        assert_eq!(wall.destination(), None);
    }

    #[test]
    fn layer_names() {
        assert_eq!(TileKind::from_layer_name("objects"), Some(TileKind::Object));
        assert_eq!(TileKind::from_layer_name("door"), Some(TileKind::Door));
        assert_eq!(TileKind::from_layer_name("clouds"), None);
    }
}
