use std::fmt;

/// Local illumination model used by the shading pass.
///
/// All three consume the same uniforms; switching only changes which program
/// is bound.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ShadingModel {
    /// Per-fragment lighting with reflected specular.
    #[default]
    Phong,
    /// Per-vertex lighting, interpolated.
    Gouraud,
    /// Per-fragment lighting with half-vector specular.
    BlinnPhong,
}

impl ShadingModel {
    pub const ALL: [ShadingModel; 3] = [
        ShadingModel::Phong,
        ShadingModel::Gouraud,
        ShadingModel::BlinnPhong,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShadingModel::Phong => "Phong",
            ShadingModel::Gouraud => "Gouraud",
            ShadingModel::BlinnPhong => "Blinn-Phong",
        }
    }

    fn index(self) -> usize {
        match self {
            ShadingModel::Phong => 0,
            ShadingModel::Gouraud => 1,
            ShadingModel::BlinnPhong => 2,
        }
    }
}

impl fmt::Display for ShadingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of building one program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProgramStatus {
    /// Not built yet.
    #[default]
    Pending,
    Ready,
    /// Compilation or validation failed; carries the compiler message.
    Failed(String),
}

impl ProgramStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ProgramStatus::Ready)
    }
}

/// Build status of every shading program plus the fallback policy.
///
/// A failed program is never retried. Requests for it resolve to Phong; if
/// Phong failed too, nothing can be drawn and the shading pass is skipped.
#[derive(Debug, Default)]
pub struct ProgramTable {
    status: [ProgramStatus; 3],
    warned: [bool; 3],
}

impl ProgramTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every program marked ready (CPU backend, tests).
    pub fn all_ready() -> Self {
        let mut table = Self::new();
        for model in ShadingModel::ALL {
            table.set(model, ProgramStatus::Ready);
        }
        table
    }

    pub fn status(&self, model: ShadingModel) -> &ProgramStatus {
        &self.status[model.index()]
    }

    pub fn set(&mut self, model: ShadingModel, status: ProgramStatus) {
        if let ProgramStatus::Failed(msg) = &status {
            log::error!("{model} program unusable: {msg}");
        }
        self.status[model.index()] = status;
    }

    /// Picks the program to bind for `requested`.
    pub fn resolve(&mut self, requested: ShadingModel) -> Option<ShadingModel> {
        if self.status(requested).is_ready() {
            return Some(requested);
        }

        let fallback = ShadingModel::default();
        let resolved = self.status(fallback).is_ready().then_some(fallback);

        let i = requested.index();
        if !self.warned[i] {
            self.warned[i] = true;
            match resolved {
                Some(f) if f != requested => {
                    log::warn!("{requested} program unavailable, drawing with {f}")
                }
                _ => log::error!("no usable shading program, shading pass skipped"),
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_program_resolves_to_itself() {
        let mut table = ProgramTable::all_ready();
        for model in ShadingModel::ALL {
            assert_eq!(table.resolve(model), Some(model));
        }
    }

    #[test]
    fn failed_program_falls_back_to_phong() {
        let mut table = ProgramTable::all_ready();
        table.set(ShadingModel::Gouraud, ProgramStatus::Failed("syntax error".into()));
        assert_eq!(table.resolve(ShadingModel::Gouraud), Some(ShadingModel::Phong));
        assert_eq!(table.resolve(ShadingModel::BlinnPhong), Some(ShadingModel::BlinnPhong));
    }

    #[test]
    fn failed_default_skips_everything_unready() {
        let mut table = ProgramTable::new();
        table.set(ShadingModel::Phong, ProgramStatus::Failed("link".into()));
        table.set(ShadingModel::BlinnPhong, ProgramStatus::Ready);
        assert_eq!(table.resolve(ShadingModel::Phong), None);
        assert_eq!(table.resolve(ShadingModel::Gouraud), None);
        assert_eq!(table.resolve(ShadingModel::BlinnPhong), Some(ShadingModel::BlinnPhong));
    }

    #[test]
    fn pending_is_not_ready() {
        let table = ProgramTable::new();
        assert_eq!(*table.status(ShadingModel::Phong), ProgramStatus::Pending);
        assert!(!table.status(ShadingModel::Phong).is_ready());
    }

    #[test]
    fn labels() {
        assert_eq!(ShadingModel::BlinnPhong.to_string(), "Blinn-Phong");
        assert_eq!(ShadingModel::default(), ShadingModel::Phong);
    }
}
