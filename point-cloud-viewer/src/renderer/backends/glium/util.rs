use crate::modules::{Key, Shortcut};
use crate::navigation::event::{Modifiers, MouseButton};
use glium::glutin::event::{ModifiersState, MouseButton as WinitMouseButton, VirtualKeyCode};
use nalgebra::Matrix4;

/// Copies a [Matrix4] matrix from nalgebra into a static array, as
/// understood by glium, and converts it from row-major format (as used by nalgebra)
/// into column-major format (as expected by glium / open gl) during that process.
pub fn matrix_to_gl(mat: &Matrix4<f64>) -> [[f32; 4]; 4] {
    [
        [mat.m11 as f32, mat.m21 as f32, mat.m31 as f32, mat.m41 as f32],
        [mat.m12 as f32, mat.m22 as f32, mat.m32 as f32, mat.m42 as f32],
        [mat.m13 as f32, mat.m23 as f32, mat.m33 as f32, mat.m43 as f32],
        [mat.m14 as f32, mat.m24 as f32, mat.m34 as f32, mat.m44 as f32],
    ]
}

pub fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift(),
        ctrl: state.ctrl(),
        alt: state.alt(),
        logo: state.logo(),
    }
}

pub fn mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Other(_) => MouseButton::Other,
    }
}

/// Maps a pressed key to a shortcut. Keys that cannot be bound give [None].
///
/// Shortcuts only carry Ctrl, so presses with Shift, Alt or Logo held do not trigger any.
pub fn shortcut(key: VirtualKeyCode, state: ModifiersState) -> Option<Shortcut> {
    use VirtualKeyCode as K;
    if state.shift() || state.alt() || state.logo() {
        return None;
    }
    let letters = [
        (K::A, 'a'),
        (K::B, 'b'),
        (K::C, 'c'),
        (K::D, 'd'),
        (K::E, 'e'),
        (K::F, 'f'),
        (K::G, 'g'),
        (K::H, 'h'),
        (K::I, 'i'),
        (K::J, 'j'),
        (K::K, 'k'),
        (K::L, 'l'),
        (K::M, 'm'),
        (K::N, 'n'),
        (K::O, 'o'),
        (K::P, 'p'),
        (K::Q, 'q'),
        (K::R, 'r'),
        (K::S, 's'),
        (K::T, 't'),
        (K::U, 'u'),
        (K::V, 'v'),
        (K::W, 'w'),
        (K::X, 'x'),
        (K::Y, 'y'),
        (K::Z, 'z'),
        (K::Key0, '0'),
        (K::Key1, '1'),
        (K::Key2, '2'),
        (K::Key3, '3'),
        (K::Key4, '4'),
        (K::Key5, '5'),
        (K::Key6, '6'),
        (K::Key7, '7'),
        (K::Key8, '8'),
        (K::Key9, '9'),
    ];
    let function_keys = [
        K::F1,
        K::F2,
        K::F3,
        K::F4,
        K::F5,
        K::F6,
        K::F7,
        K::F8,
        K::F9,
        K::F10,
        K::F11,
        K::F12,
    ];

    let key = if let Some(&(_, c)) = letters.iter().find(|(k, _)| *k == key) {
        Key::Char(c)
    } else if let Some(n) = function_keys.iter().position(|k| *k == key) {
        Key::F(n as u8 + 1)
    } else {
        match key {
            K::Home => Key::Home,
            K::Escape => Key::Escape,
            K::Delete => Key::Delete,
            _ => return None,
        }
    };
    Some(Shortcut {
        key,
        ctrl: state.ctrl(),
    })
}

#[cfg(test)]
mod tests {
    use super::{matrix_to_gl, shortcut};
    use crate::modules::{Key, Shortcut};
    use glium::glutin::event::{ModifiersState, VirtualKeyCode};
    use nalgebra::{Matrix4, Vector3};

    #[test]
    fn test_matrix_is_column_major() {
        let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let gl = matrix_to_gl(&m);
        assert_eq!(gl[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(gl[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(
            shortcut(VirtualKeyCode::R, ModifiersState::empty()),
            Some(Shortcut::key(Key::Char('r')))
        );
        assert_eq!(
            shortcut(VirtualKeyCode::Q, ModifiersState::CTRL),
            Some(Shortcut::ctrl(Key::Char('q')))
        );
        assert_eq!(
            shortcut(VirtualKeyCode::F1, ModifiersState::empty()),
            Some(Shortcut::key(Key::F(1)))
        );
        assert_eq!(shortcut(VirtualKeyCode::LShift, ModifiersState::SHIFT), None);
    }

    #[test]
    fn test_shortcuts_ignore_other_modifiers() {
        assert_eq!(shortcut(VirtualKeyCode::E, ModifiersState::ALT), None);
        assert_eq!(shortcut(VirtualKeyCode::E, ModifiersState::SHIFT), None);
        assert_eq!(shortcut(VirtualKeyCode::Q, ModifiersState::LOGO), None);
        assert_eq!(
            shortcut(VirtualKeyCode::Q, ModifiersState::CTRL | ModifiersState::SHIFT),
            None
        );
        assert_eq!(
            shortcut(VirtualKeyCode::E, ModifiersState::empty()),
            Some(Shortcut::key(Key::Char('e')))
        );
    }
}
