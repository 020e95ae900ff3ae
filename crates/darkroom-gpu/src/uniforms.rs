//! Uniform and vertex layouts shared with the WGSL program.
//!
//! [`ParamsUniform`] packs one frame into eight `vec4<f32>` slots
//! (128 bytes). The slot order is fixed by the `Params` struct in
//! [`shaders::ADJUST`](crate::shaders::ADJUST); change both together.
//!
//! | slot | x          | y               | z                     | w          |
//! |------|------------|-----------------|-----------------------|------------|
//! | 0    | exposure   | contrast        | highlights            | shadows    |
//! | 1    | whites     | blacks          | gamma                 | warmth     |
//! | 2    | tint       | hue (degrees)   | saturation            | luminance  |
//! | 3    | sharpening | noise reduction | colour noise red.     | vignette   |
//! | 4    | dehaze     | grain           | width                 | height     |
//! | 5    | brush x    | brush y         | radius                | opacity    |
//! | 6    | colour r   | colour g        | colour b              | mode tag   |
//! | 7    | clone dx   | clone dy        | heal reach            | unused     |

use bytemuck::{Pod, Zeroable};
use darkroom_ops::FrameUniforms;

/// Frame uniforms as uploaded to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParamsUniform {
    /// Eight vec4 slots, see the module table.
    pub slots: [[f32; 4]; 8],
}

impl ParamsUniform {
    /// Packs frame uniforms for a `width` x `height` source.
    pub fn pack(frame: &FrameUniforms, width: u32, height: u32) -> Self {
        let a = &frame.adjustments;
        let mut slots = [
            [a.exposure, a.contrast, a.highlights, a.shadows],
            [a.whites, a.blacks, a.gamma, a.warmth],
            [a.tint, a.hue, a.saturation, a.luminance],
            [a.sharpening, a.noise_reduction, a.color_noise_reduction, a.vignette],
            [a.dehaze, a.grain, width as f32, height as f32],
            [0.0; 4],
            [0.0; 4],
            [0.0; 4],
        ];

        if let Some(dab) = &frame.brush {
            let (dx, dy) = dab.clone_offset().unwrap_or((0, 0));
            slots[5] = [dab.center[0], dab.center[1], dab.radius, dab.opacity];
            slots[6] = [dab.color[0], dab.color[1], dab.color[2], dab.mode.tag() as f32];
            slots[7] = [dx as f32, dy as f32, dab.heal_reach() as f32, 0.0];
        }

        Self { slots }
    }

    /// Mode tag slot (`0` when no dab is active).
    pub fn brush_mode(&self) -> u32 {
        self.slots[6][3] as u32
    }
}

/// Full-screen quad vertex: clip-space position and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Clip-space position.
    pub position: [f32; 2],
    /// Texture coordinate, origin top left.
    pub uv: [f32; 2],
}

/// Triangle-strip quad covering the whole target.
pub const QUAD: [Vertex; 4] = [
    Vertex { position: [-1.0, 1.0], uv: [0.0, 0.0] },
    Vertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    Vertex { position: [1.0, 1.0], uv: [1.0, 0.0] },
    Vertex { position: [1.0, -1.0], uv: [1.0, 1.0] },
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use darkroom_ops::{AdjustmentState, BrushDab, DabMode, Param};

    #[test]
    fn test_uniform_is_128_bytes() {
        assert_eq!(std::mem::size_of::<ParamsUniform>(), 128);
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
    }

    #[test]
    fn test_pack_params() {
        let mut adj = AdjustmentState::default();
        adj.set(Param::Gamma, 2.0);
        adj.set(Param::Grain, 0.5);
        adj.set(Param::Exposure, 0.37);
        let u = ParamsUniform::pack(&FrameUniforms::new(&adj, None), 640, 480);
        assert_relative_eq!(u.slots[1][2], 2.0);
        assert_relative_eq!(u.slots[0][0], 0.37, epsilon = 1e-6);
        assert_eq!(u.slots[4], [0.0, 0.5, 640.0, 480.0]);
        assert_eq!(u.brush_mode(), 0);
    }

    #[test]
    fn test_pack_clone_dab() {
        let dab = BrushDab {
            center: [10.0, 20.0],
            radius: 12.0,
            opacity: 0.5,
            color: [0.0; 3],
            mode: DabMode::Clone { offset: [-4.6, 2.2] },
        };
        let u = ParamsUniform::pack(&FrameUniforms::new(&AdjustmentState::default(), Some(dab)), 64, 64);
        assert_eq!(u.brush_mode(), 2);
        assert_eq!(u.slots[5], [10.0, 20.0, 12.0, 0.5]);
        assert_eq!(u.slots[7], [-5.0, 2.0, 3.0, 0.0]);
        assert_relative_eq!(u.slots[5][3], 0.5);
    }
}
