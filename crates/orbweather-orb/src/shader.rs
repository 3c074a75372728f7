//! Orb program sources and a CPU evaluation of the fragment stage.
//!
//! `OrbShader::shade` mirrors `orb.frag` closely enough for terminal previews
//! and tests; GPU hosts compile the GLSL directly.

use crate::uniforms::UniformSet;

pub const VERTEX_SRC: &str = include_str!("shaders/orb.vert");
pub const FRAGMENT_SRC: &str = include_str!("shaders/orb.frag");

/// Uniform names declared by `FRAGMENT_SRC`, in `GpuUniforms` order.
pub const UNIFORM_NAMES: [&str; 6] = ["iTime", "hue", "hover", "rot", "iResolution", "hoverIntensity"];

type Vec2 = [f32; 2];
type Vec3 = [f32; 3];

const BASE_COLOR_1: Vec3 = [0.611765, 0.262745, 0.996078];
const BASE_COLOR_2: Vec3 = [0.298039, 0.760784, 0.913725];
const BASE_COLOR_3: Vec3 = [0.062745, 0.078431, 0.600000];
const INNER_RADIUS: f32 = 0.6;
const NOISE_SCALE: f32 = 0.65;

fn dot3(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn map3(a: Vec3, f: impl Fn(f32) -> f32) -> Vec3 {
    [f(a[0]), f(a[1]), f(a[2])]
}

fn zip3(a: Vec3, b: Vec3, f: impl Fn(f32, f32) -> f32) -> Vec3 {
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2])]
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    zip3(a, b, |x, y| mix(x, y, t))
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn length2(v: Vec2) -> f32 {
    v[0].hypot(v[1])
}

fn distance2(a: Vec2, b: Vec2) -> f32 {
    length2([a[0] - b[0], a[1] - b[1]])
}

fn rgb_to_yiq(c: Vec3) -> Vec3 {
    [
        dot3(c, [0.299, 0.587, 0.114]),
        dot3(c, [0.596, -0.274, -0.322]),
        dot3(c, [0.211, -0.523, 0.312]),
    ]
}

fn yiq_to_rgb(c: Vec3) -> Vec3 {
    [
        c[0] + 0.956 * c[1] + 0.621 * c[2],
        c[0] - 0.272 * c[1] - 0.647 * c[2],
        c[0] - 1.106 * c[1] + 1.703 * c[2],
    ]
}

/// Rotate chroma in YIQ space by `hue_deg`.
pub fn adjust_hue(color: Vec3, hue_deg: f32) -> Vec3 {
    let (sin_a, cos_a) = hue_deg.to_radians().sin_cos();
    let yiq = rgb_to_yiq(color);
    let i = yiq[1] * cos_a - yiq[2] * sin_a;
    let q = yiq[1] * sin_a + yiq[2] * cos_a;
    yiq_to_rgb([yiq[0], i, q])
}

fn hash33(p: Vec3) -> Vec3 {
    let mut p3 = zip3(p, [0.1031, 0.11369, 0.13787], |a, b| fract(a * b));
    let d = dot3(p3, [p3[1] + 19.19, p3[0] + 19.19, p3[2] + 19.19]);
    p3 = map3(p3, |v| v + d);
    let mixed = [p3[0] + p3[1], p3[0] + p3[2], p3[1] + p3[2]];
    let swizzled = [p3[2], p3[1], p3[0]];
    zip3(mixed, swizzled, |a, b| -1.0 + 2.0 * fract(a * b))
}

/// 3D simplex noise, roughly in [-1, 1].
pub fn simplex3(p: Vec3) -> f32 {
    const K1: f32 = 0.333_333_33;
    const K2: f32 = 0.166_666_67;

    let skew = (p[0] + p[1] + p[2]) * K1;
    let i = map3(p, |v| (v + skew).floor());
    let unskew = (i[0] + i[1] + i[2]) * K2;
    let d0 = zip3(p, i, |a, b| a - (b - unskew));

    let yzx = [d0[1], d0[2], d0[0]];
    let e = zip3(d0, yzx, |a, b| if a - b < 0.0 { 0.0 } else { 1.0 });
    let ezxy = [e[2], e[0], e[1]];
    let i1 = zip3(e, ezxy, |a, b| a * (1.0 - b));
    let i2 = zip3(ezxy, e, |b, a| 1.0 - b * (1.0 - a));

    let d1 = zip3(d0, i1, |a, b| a - (b - K2));
    let d2 = zip3(d0, i2, |a, b| a - (b - K1));
    let d3 = map3(d0, |a| a - 0.5);

    let corners = [
        (d0, i),
        (d1, zip3(i, i1, |a, b| a + b)),
        (d2, zip3(i, i2, |a, b| a + b)),
        (d3, map3(i, |a| a + 1.0)),
    ];

    let sum: f32 = corners
        .iter()
        .map(|&(d, cell)| {
            let h = (0.6 - dot3(d, d)).max(0.0);
            h * h * h * h * dot3(d, hash33(cell))
        })
        .sum();
    31.316 * sum
}

fn light1(intensity: f32, attenuation: f32, dist: f32) -> f32 {
    intensity / (1.0 + dist * attenuation)
}

fn light2(intensity: f32, attenuation: f32, dist: f32) -> f32 {
    intensity / (1.0 + dist * dist * attenuation)
}

/// Straight (non-premultiplied) colour and alpha.
fn extract_alpha(c: Vec3) -> [f32; 4] {
    let a = c[0].max(c[1]).max(c[2]);
    let inv = 1.0 / (a + 1e-5);
    [c[0] * inv, c[1] * inv, c[2] * inv, a]
}

/// CPU evaluation of the orb fragment program.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbShader;

impl OrbShader {
    fn draw(uv: Vec2, u: &UniformSet) -> [f32; 4] {
        let t = u.time;
        let color1 = adjust_hue(BASE_COLOR_1, u.hue);
        let color2 = adjust_hue(BASE_COLOR_2, u.hue);
        let color3 = adjust_hue(BASE_COLOR_3, u.hue);

        let ang = uv[1].atan2(uv[0]);
        let len = length2(uv);
        let inv_len = if len > 0.0 { 1.0 / len } else { 0.0 };

        let n0 = simplex3([uv[0] * NOISE_SCALE, uv[1] * NOISE_SCALE, t * 0.5]) * 0.5 + 0.5;
        let r0 = mix(
            mix(INNER_RADIUS, 1.0, 0.4),
            mix(INNER_RADIUS, 1.0, 0.6),
            n0,
        );
        let d0 = distance2(uv, [r0 * inv_len * uv[0], r0 * inv_len * uv[1]]);
        let v0 = light1(1.0, 10.0, d0) * smoothstep(r0 * 1.05, r0, len);
        let cl = (ang + t * 2.0).cos() * 0.5 + 0.5;

        let a = -t;
        let pos = [a.cos() * r0, a.sin() * r0];
        let d = distance2(uv, pos);
        let v1 = light2(1.5, 5.0, d) * light1(1.0, 50.0, d0);

        let v2 = smoothstep(1.0, mix(INNER_RADIUS, 1.0, n0 * 0.5), len);
        let v3 = smoothstep(INNER_RADIUS, mix(INNER_RADIUS, 1.0, 0.5), len);

        let col = mix3(color1, color2, cl);
        let col = mix3(color3, col, v0);
        let col = map3(col, |c| ((c + v1) * v2 * v3).clamp(0.0, 1.0));

        extract_alpha(col)
    }

    /// Premultiplied RGBA for pixel `frag_coord` (origin bottom-left).
    pub fn shade(frag_coord: Vec2, u: &UniformSet) -> [f32; 4] {
        let res = u.resolution;
        let size = res.width.min(res.height);
        if size <= 0.0 {
            return [0.0; 4];
        }

        let mut uv = [
            (frag_coord[0] - res.width * 0.5) / size * 2.0,
            (frag_coord[1] - res.height * 0.5) / size * 2.0,
        ];

        let (s, c) = u.rotation.sin_cos();
        uv = [c * uv[0] - s * uv[1], s * uv[0] + c * uv[1]];

        let wobble = u.hover * u.hover_intensity * 0.1;
        uv[0] += wobble * (uv[1] * 10.0 + u.time).sin();
        uv[1] += wobble * (uv[0] * 10.0 + u.time).sin();

        let [r, g, b, a] = Self::draw(uv, u);
        [r * a, g * a, b * a, a]
    }
}
