//! WGSL source for the adjustment program.
//!
//! One program draws the whole frame: a pass-through vertex stage for the
//! full-screen quad and a fragment stage that runs all seventeen stages per
//! pixel. The fragment code mirrors `darkroom_ops::stages` operation for
//! operation, including the stage-by-stage clamping, the LUT interpolation
//! and the integer grain hash.

/// Vertex + fragment program for the adjustment pipeline.
///
/// Bindings (group 0):
/// - 0: `Params` uniform (see [`ParamsUniform`](crate::ParamsUniform))
/// - 1: source texture, RGBA8
/// - 2..=5: combined, red, green, blue LUTs, `N x 1` R32Float
pub const ADJUST: &str = r#"
struct Params {
    tone: vec4<f32>,        // exposure, contrast, highlights, shadows
    tone2: vec4<f32>,       // whites, blacks, gamma, warmth
    color: vec4<f32>,       // tint, hue, saturation, luminance
    detail: vec4<f32>,      // sharpening, noise_reduction, color_noise_reduction, vignette
    misc: vec4<f32>,        // dehaze, grain, width, height
    brush: vec4<f32>,       // center.x, center.y, radius, opacity
    brush_color: vec4<f32>, // r, g, b, mode tag
    brush_extra: vec4<f32>, // clone dx, clone dy, heal reach, unused
}

@group(0) @binding(0) var<uniform> params: Params;
@group(0) @binding(1) var source_tex: texture_2d<f32>;
@group(0) @binding(2) var lut_combined: texture_2d<f32>;
@group(0) @binding(3) var lut_red: texture_2d<f32>;
@group(0) @binding(4) var lut_green: texture_2d<f32>;
@group(0) @binding(5) var lut_blue: texture_2d<f32>;

struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) uv: vec2<f32>) -> VertexOut {
    var out: VertexOut;
    out.position = vec4<f32>(position, 0.0, 1.0);
    out.uv = uv;
    return out;
}

const LUMA: vec3<f32> = vec3<f32>(0.299, 0.587, 0.114);

fn clamp01(c: vec3<f32>) -> vec3<f32> {
    return clamp(c, vec3<f32>(0.0), vec3<f32>(1.0));
}

fn dims() -> vec2<i32> {
    return vec2<i32>(textureDimensions(source_tex));
}

fn load_texel(p: vec2<i32>) -> vec4<f32> {
    let q = clamp(p, vec2<i32>(0), dims() - vec2<i32>(1));
    return textureLoad(source_tex, q, 0);
}

fn sample_lut(lut: texture_2d<f32>, v: f32) -> f32 {
    let size = i32(textureDimensions(lut).x);
    let idx_f = clamp(v, 0.0, 1.0) * f32(size - 1);
    let i0 = min(i32(floor(idx_f)), size - 1);
    let i1 = min(i0 + 1, size - 1);
    let frac = idx_f - f32(i0);
    let a = textureLoad(lut, vec2<i32>(i0, 0), 0).r;
    let b = textureLoad(lut, vec2<i32>(i1, 0), 0).r;
    return a * (1.0 - frac) + b * frac;
}

fn pcg_hash(v: u32) -> u32 {
    let state = v * 747796405u + 2891336453u;
    let word = ((state >> ((state >> 28u) + 4u)) ^ state) * 277803737u;
    return (word >> 22u) ^ word;
}

fn grain_noise(p: vec2<i32>) -> f32 {
    let h = pcg_hash(u32(p.x) ^ pcg_hash(u32(p.y)));
    return f32(h >> 8u) / 16777216.0;
}

fn hue_rotate(c: vec3<f32>, degrees: f32) -> vec3<f32> {
    if (degrees == 0.0) {
        return c;
    }
    let rad = radians(degrees);
    let s = sin(rad);
    let k = cos(rad);
    let r = vec3<f32>(0.213 + k * 0.787 - s * 0.213, 0.715 - k * 0.715 - s * 0.715, 0.072 - k * 0.072 + s * 0.928);
    let g = vec3<f32>(0.213 - k * 0.213 + s * 0.143, 0.715 + k * 0.285 + s * 0.140, 0.072 - k * 0.072 - s * 0.283);
    let b = vec3<f32>(0.213 - k * 0.213 - s * 0.787, 0.715 - k * 0.715 + s * 0.715, 0.072 + k * 0.928 + s * 0.072);
    return clamp01(vec3<f32>(dot(r, c), dot(g, c), dot(b, c)));
}

// Stages 1-16 at pixel p (edge-clamped).
fn adjust(p_in: vec2<i32>) -> vec3<f32> {
    let size = dims();
    let p = clamp(p_in, vec2<i32>(0), size - vec2<i32>(1));

    let centre = load_texel(p).rgb;
    let sum = load_texel(p + vec2<i32>(0, -1)).rgb + load_texel(p + vec2<i32>(0, 1)).rgb
        + load_texel(p + vec2<i32>(1, 0)).rgb + load_texel(p + vec2<i32>(-1, 0)).rgb;

    // 1. sharpening
    let sharp = params.detail.x;
    var c = clamp01(centre * (1.0 + 4.0 * sharp) - sharp * sum);

    // 2. noise reduction
    let nr = params.detail.y;
    c = clamp01(c + (sum * 0.25 - c) * nr);

    // 3. curves
    c = vec3<f32>(
        sample_lut(lut_combined, sample_lut(lut_red, c.r)),
        sample_lut(lut_combined, sample_lut(lut_green, c.g)),
        sample_lut(lut_combined, sample_lut(lut_blue, c.b)),
    );
    c = clamp01(c);

    // 4. saturation
    let gray4 = dot(c, LUMA);
    c = clamp01(vec3<f32>(gray4) + (c - vec3<f32>(gray4)) * params.color.z);

    // 5. brightness / contrast
    c = clamp01((c - vec3<f32>(0.5)) * params.tone.y + vec3<f32>(0.5 + params.tone.x));

    // 6. shadows / highlights
    let l = dot(c, LUMA);
    let offset = params.tone.w * (1.0 - l) * (1.0 - l) + params.tone.z * l * l;
    c = clamp01(c + vec3<f32>(offset));

    // 7. whites / blacks
    c = clamp01(c + params.tone2.x * c + params.tone2.y * (vec3<f32>(1.0) - c));

    // 8. gamma
    let gamma = params.tone2.z;
    if (gamma != 1.0) {
        c = clamp01(pow(max(c, vec3<f32>(0.0)), vec3<f32>(1.0 / gamma)));
    }

    // 9. warmth
    let warmth = params.tone2.w;
    c = vec3<f32>(clamp(c.r + 0.1 * warmth, 0.0, 1.0), c.g, clamp(c.b - 0.1 * warmth, 0.0, 1.0));

    // 10. tint
    c = vec3<f32>(c.r, clamp(c.g + 0.1 * params.color.x, 0.0, 1.0), c.b);

    // 11. hue
    c = hue_rotate(c, params.color.y);

    // 12. luminance
    c = clamp01(c * params.color.w);

    // 13. colour noise reduction
    let gray13 = dot(c, LUMA);
    c = clamp01(c + (vec3<f32>(gray13) - c) * params.detail.z);

    // 14. vignette
    let uv = (vec2<f32>(p) + vec2<f32>(0.5)) / vec2<f32>(size);
    let falloff = smoothstep(0.25, 0.75, length(uv - vec2<f32>(0.5)));
    c = clamp01(c * (1.0 - params.detail.w * falloff));

    // 15. dehaze
    let dark = min(c.r, min(c.g, c.b));
    c = clamp01(c + vec3<f32>(params.misc.x * dark));

    // 16. grain
    let n = grain_noise(p) - 0.5;
    c = clamp01(c + vec3<f32>(params.misc.y * 0.2 * n));

    return c;
}

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let size = dims();
    let p = clamp(vec2<i32>(floor(in.uv * vec2<f32>(size))), vec2<i32>(0), size - vec2<i32>(1));
    var c = adjust(p);

    // 17. brush overlay
    let mode = u32(params.brush_color.w + 0.5);
    let radius = params.brush.z;
    if (mode != 0u && radius > 0.0) {
        let d = distance(vec2<f32>(p), params.brush.xy);
        if (d < radius) {
            let w = clamp(params.brush.w, 0.0, 1.0) * (1.0 - d / radius);
            var dab = params.brush_color.rgb;
            if (mode == 2u) {
                dab = adjust(p + vec2<i32>(params.brush_extra.xy));
            } else if (mode == 3u) {
                let r = i32(params.brush_extra.z);
                dab = (adjust(p + vec2<i32>(-r, 0)) + adjust(p + vec2<i32>(r, 0))
                    + adjust(p + vec2<i32>(0, -r)) + adjust(p + vec2<i32>(0, r))) * 0.25;
            }
            c = clamp01(c * (1.0 - w) + dab * w);
        }
    }

    return vec4<f32>(c, load_texel(p).a);
}
"#;
