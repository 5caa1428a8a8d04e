use cgmath::{Vector2, Vector4};

/// Cleared depth value; also "nothing rendered here".
pub const FAR_DEPTH: f32 = 1.0;

/// CPU depth target. Row 0 is the bottom of the light's view.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    width: u32,
    height: u32,
    texels: Vec<f32>,
}

impl DepthMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            texels: vec![FAR_DEPTH; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resizes if needed and resets every texel to [`FAR_DEPTH`].
    pub fn clear(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        } else {
            self.texels.fill(FAR_DEPTH);
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.texels[(y * self.width + x) as usize])
    }

    pub fn texels(&self) -> &[f32] {
        &self.texels
    }

    /// Nearest stored depth at normalized map coordinates (`[0, 1)` on both axes).
    pub fn sample(&self, u: f32, v: f32) -> Option<f32> {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let x = (u * self.width as f32) as u32;
        let y = (v * self.height as f32) as u32;
        self.get(x, y)
    }

    /// Rasterizes one clip-space triangle, keeping the nearest depth per texel.
    ///
    /// Fragments outside `[0, 1]` depth are dropped, as is anything outside the
    /// map, so geometry beyond the light's volume leaves no trace.
    pub fn rasterize(&mut self, clip: [Vector4<f32>; 3]) {
        if clip.iter().any(|c| c.w <= 0.0) {
            return;
        }

        let mut screen = [Vector2::new(0.0f32, 0.0); 3];
        let mut depth = [0.0f32; 3];
        for (i, c) in clip.iter().enumerate() {
            let ndc = c.truncate() / c.w;
            screen[i] = Vector2::new(
                (ndc.x * 0.5 + 0.5) * self.width as f32,
                (ndc.y * 0.5 + 0.5) * self.height as f32,
            );
            depth[i] = ndc.z * 0.5 + 0.5;
        }

        let (min_x, min_y, max_x, max_y) = bounding_box(&screen);
        let x0 = min_x.max(0);
        let y0 = min_y.max(0);
        let x1 = max_x.min(self.width as i32 - 1);
        let y1 = max_y.min(self.height as i32 - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric(&screen, p) else {
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let z = w0 * depth[0] + w1 * depth[1] + w2 * depth[2];
                if !(0.0..=1.0).contains(&z) {
                    continue;
                }

                let i = (y as u32 * self.width + x as u32) as usize;
                if z < self.texels[i] {
                    self.texels[i] = z;
                }
            }
        }
    }
}

fn bounding_box(v: &[Vector2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = v[0].x.min(v[1].x).min(v[2].x);
    let max_x = v[0].x.max(v[1].x).max(v[2].x);
    let min_y = v[0].y.min(v[1].y).min(v[2].y);
    let max_y = v[0].y.max(v[1].y).max(v[2].y);

    // Saturating float -> int casts keep huge off-map triangles bounded.
    (
        min_x.floor() as i32,
        min_y.floor() as i32,
        max_x.ceil() as i32,
        max_y.ceil() as i32,
    )
}

/// Weights of `p` relative to `v[0]`, `v[1]`, `v[2]`; `None` for degenerate
/// triangles. Independent of winding.
fn barycentric(v: &[Vector2<f32>; 3], p: Vector2<f32>) -> Option<(f32, f32, f32)> {
    let e0 = v[1] - v[0];
    let e1 = v[2] - v[0];
    let ep = p - v[0];

    let denom = e0.x * e1.y - e1.x * e0.y;
    if denom.abs() < 1e-12 {
        return None;
    }

    let w1 = (ep.x * e1.y - e1.x * ep.y) / denom;
    let w2 = (e0.x * ep.y - ep.x * e0.y) / denom;
    Some((1.0 - w1 - w2, w1, w2))
}
