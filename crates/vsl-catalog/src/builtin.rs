//! The compiled-in metadata table for the synth DSL.
//!
//! Entries are grouped by category and inserted in a fixed order: sources,
//! coordinate transforms, color transforms, blend combinators, modulation
//! combinators, external sources, output sinks, then globals. Candidate
//! lists inherit this order.

use crate::{Catalog, Category, FunctionSignature, Param, ParamType};

/// (name, [(param name, declared type, default or "")])
type FnRow = (&'static str, &'static [(&'static str, &'static str, &'static str)]);

const SOURCES: &[FnRow] = &[
    ("noise", &[("scale", "float", "10"), ("offset", "float", "0.1")]),
    (
        "voronoi",
        &[
            ("scale", "float", "5"),
            ("speed", "float", "0.3"),
            ("blending", "float", "0.3"),
        ],
    ),
    (
        "osc",
        &[
            ("frequency", "float", "60"),
            ("sync", "float", "0.1"),
            ("offset", "float", "0"),
        ],
    ),
    (
        "shape",
        &[
            ("sides", "float", "3"),
            ("radius", "float", "0.3"),
            ("smoothing", "float", "0.01"),
        ],
    ),
    ("gradient", &[("speed", "float", "0")]),
    ("src", &[("tex", "sampler2D", "")]),
    (
        "solid",
        &[
            ("r", "float", "0"),
            ("g", "float", "0"),
            ("b", "float", "0"),
            ("a", "float", "1"),
        ],
    ),
];

const COORD: &[FnRow] = &[
    ("rotate", &[("angle", "float", "10"), ("speed", "float", "0")]),
    (
        "scale",
        &[
            ("amount", "float", "1.5"),
            ("xMult", "float", "1"),
            ("yMult", "float", "1"),
            ("offsetX", "float", "0.5"),
            ("offsetY", "float", "0.5"),
        ],
    ),
    (
        "pixelate",
        &[("pixelX", "float", "20"), ("pixelY", "float", "20")],
    ),
    (
        "repeat",
        &[
            ("repeatX", "float", "3"),
            ("repeatY", "float", "3"),
            ("offsetX", "float", "0"),
            ("offsetY", "float", "0"),
        ],
    ),
    ("repeatX", &[("reps", "float", "3"), ("offset", "float", "0")]),
    ("repeatY", &[("reps", "float", "3"), ("offset", "float", "0")]),
    ("kaleid", &[("nSides", "float", "4")]),
    (
        "scroll",
        &[
            ("scrollX", "float", "0.5"),
            ("scrollY", "float", "0.5"),
            ("speedX", "float", "0"),
            ("speedY", "float", "0"),
        ],
    ),
    (
        "scrollX",
        &[("scrollX", "float", "0.5"), ("speed", "float", "0")],
    ),
    (
        "scrollY",
        &[("scrollY", "float", "0.5"), ("speed", "float", "0")],
    ),
];

const COLOR: &[FnRow] = &[
    (
        "posterize",
        &[("bins", "float", "3"), ("gamma", "float", "0.6")],
    ),
    (
        "shift",
        &[
            ("r", "float", "0.5"),
            ("g", "float", "0"),
            ("b", "float", "0"),
            ("a", "float", "0"),
        ],
    ),
    ("invert", &[("amount", "float", "1")]),
    ("contrast", &[("amount", "float", "1.6")]),
    ("brightness", &[("amount", "float", "0.4")]),
    (
        "luma",
        &[("threshold", "float", "0.5"), ("tolerance", "float", "0.1")],
    ),
    (
        "thresh",
        &[("threshold", "float", "0.5"), ("tolerance", "float", "0.04")],
    ),
    (
        "color",
        &[
            ("r", "float", "1"),
            ("g", "float", "1"),
            ("b", "float", "1"),
            ("a", "float", "1"),
        ],
    ),
    ("saturate", &[("amount", "float", "2")]),
    ("hue", &[("hue", "float", "0.4")]),
    ("colorama", &[("amount", "float", "0.005")]),
    ("r", &[("scale", "float", "1"), ("offset", "float", "0")]),
    ("g", &[("scale", "float", "1"), ("offset", "float", "0")]),
    ("b", &[("scale", "float", "1"), ("offset", "float", "0")]),
    ("a", &[("scale", "float", "1"), ("offset", "float", "0")]),
];

const COMBINE: &[FnRow] = &[
    ("add", &[("texture", "sampler2D", ""), ("amount", "float", "1")]),
    ("sub", &[("texture", "sampler2D", ""), ("amount", "float", "1")]),
    ("layer", &[("texture", "sampler2D", "")]),
    (
        "blend",
        &[("texture", "sampler2D", ""), ("amount", "float", "0.5")],
    ),
    ("mult", &[("texture", "sampler2D", ""), ("amount", "float", "1")]),
    ("diff", &[("texture", "sampler2D", "")]),
    ("mask", &[("texture", "sampler2D", "")]),
];

const COMBINE_COORD: &[FnRow] = &[
    (
        "modulateRepeat",
        &[
            ("texture", "sampler2D", ""),
            ("repeatX", "float", "3"),
            ("repeatY", "float", "3"),
            ("offsetX", "float", "0.5"),
            ("offsetY", "float", "0.5"),
        ],
    ),
    (
        "modulateRepeatX",
        &[
            ("texture", "sampler2D", ""),
            ("reps", "float", "3"),
            ("offset", "float", "0.5"),
        ],
    ),
    (
        "modulateRepeatY",
        &[
            ("texture", "sampler2D", ""),
            ("reps", "float", "3"),
            ("offset", "float", "0.5"),
        ],
    ),
    (
        "modulateKaleid",
        &[("texture", "sampler2D", ""), ("nSides", "float", "4")],
    ),
    (
        "modulateScrollX",
        &[
            ("texture", "sampler2D", ""),
            ("scrollX", "float", "0.5"),
            ("speed", "float", "0"),
        ],
    ),
    (
        "modulateScrollY",
        &[
            ("texture", "sampler2D", ""),
            ("scrollY", "float", "0.5"),
            ("speed", "float", "0"),
        ],
    ),
    (
        "modulate",
        &[("texture", "sampler2D", ""), ("amount", "float", "0.1")],
    ),
    (
        "modulateScale",
        &[
            ("texture", "sampler2D", ""),
            ("multiple", "float", "1"),
            ("offset", "float", "1"),
        ],
    ),
    (
        "modulatePixelate",
        &[
            ("texture", "sampler2D", ""),
            ("multiple", "float", "10"),
            ("offset", "float", "3"),
        ],
    ),
    (
        "modulateRotate",
        &[
            ("texture", "sampler2D", ""),
            ("multiple", "float", "1"),
            ("offset", "float", "0"),
        ],
    ),
    (
        "modulateHue",
        &[("texture", "sampler2D", ""), ("amount", "float", "1")],
    ),
];

const EXTERNAL: &[FnRow] = &[
    ("initCam", &[("index", "float", "0")]),
    ("initImage", &[("url", "string", "")]),
    ("initVideo", &[("url", "string", "")]),
    ("initStream", &[("name", "string", "")]),
    ("initScreen", &[]),
];

const SINKS: &[FnRow] = &[
    ("out", &[("buffer", "tex", "o0")]),
    ("render", &[("target", "tex", "")]),
];

const GLOBALS: &[(&str, Category)] = &[
    ("time", Category::Scalar),
    ("bpm", Category::Scalar),
    ("width", Category::Scalar),
    ("height", Category::Scalar),
    ("mouse", Category::Scalar),
    ("o0", Category::Output),
    ("o1", Category::Output),
    ("o2", Category::Output),
    ("o3", Category::Output),
    ("s0", Category::Input),
    ("s1", Category::Input),
    ("s2", Category::Input),
    ("s3", Category::Input),
];

impl Catalog {
    /// The compiled-in table covering the whole builtin DSL surface.
    pub fn builtin() -> Self {
        let mut catalog = Catalog::new();
        let groups: &[(Category, &[FnRow])] = &[
            (Category::Source, SOURCES),
            (Category::Coord, COORD),
            (Category::Color, COLOR),
            (Category::Combine, COMBINE),
            (Category::CombineCoord, COMBINE_COORD),
            (Category::External, EXTERNAL),
            (Category::Output, SINKS),
        ];
        for &(category, rows) in groups {
            for &(name, params) in rows {
                catalog.insert(FunctionSignature {
                    name: name.to_string(),
                    category,
                    params: params
                        .iter()
                        .map(|&(pname, ty, default)| Param {
                            name: pname.to_string(),
                            ty: ParamType::from(ty.to_string()),
                            default: if default.is_empty() {
                                None
                            } else {
                                Some(default.to_string())
                            },
                        })
                        .collect(),
                });
            }
        }
        for &(name, category) in GLOBALS {
            catalog.insert(FunctionSignature {
                name: name.to_string(),
                category,
                params: Vec::new(),
            });
        }
        catalog
    }
}
