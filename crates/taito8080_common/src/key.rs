/// Logical key set shared between frontends and machines.
///
/// Frontends map their native keycodes onto this enum; machines decide what
/// each key means. Unmapped keys arrive as `Key::None` and are ignored.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Num1,
    Num2,
    A,
    C,
    D,
    J,
    K,
    L,
    P,
    S,
    T,
    W,
    Space,
    Up,
    Down,
    Left,
    Right,
    Escape,
    None,
}
