//! ASCII PLY 1.0 reading and writing.
//!
//! Only the subset needed for polygon meshes is supported: a `vertex`
//! element whose first three properties are the coordinates, followed by a
//! `face` element with a vertex index list and optional `red`, `green` and
//! `blue` colour properties after the list.
//!
//! ```text
//! ply
//! format ascii 1.0
//! element vertex 3
//! property double x
//! property double y
//! property double z
//! element face 1
//! property list uchar int vertex_index
//! property uchar red
//! property uchar green
//! property uchar blue
//! end_header
//! 0 0 0
//! 1 0 0
//! 0 1 0
//! 3 0 1 2 255 0 0
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use bsp_csg::Point;
use tracing::debug;

use crate::error::MeshError;
use crate::mesh::{Face, IndexedMesh, Rgb};

const WHITE: Rgb = [255, 255, 255];

/// Layout read from a PLY header: elements in file order with their
/// declared record counts.
#[derive(Debug, Default, PartialEq)]
struct Header {
    elements: Vec<(Element, usize)>,
    face_colors: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Element {
    Vertex,
    Face,
    /// Any other element (`edge`, `material`...); its records are skipped.
    Other(String),
}

/// Line source that remembers the 1-based number of the last line read.
struct LineReader<R> {
    lines: Lines<R>,
    number: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }

    /// Next line with surrounding whitespace removed.
    fn next_line(&mut self) -> Result<String, MeshError> {
        let line = self.lines.next().ok_or(MeshError::UnexpectedEof)??;
        self.number += 1;
        Ok(line.trim().to_owned())
    }

    /// Next non-blank line.
    fn next_record(&mut self) -> Result<String, MeshError> {
        loop {
            let line = self.next_line()?;
            if !line.is_empty() {
                return Ok(line);
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> MeshError {
        MeshError::Parse {
            line: self.number,
            message: message.into(),
        }
    }
}

/// Reads an ASCII PLY mesh.
///
/// Elements other than `vertex` and `face` are skipped. A face whose index
/// list repeats its first index at the end (a closed loop) is opened again.
pub fn read_ply<R: BufRead>(reader: R) -> Result<IndexedMesh, MeshError> {
    let mut lines = LineReader::new(reader);
    let header = read_header(&mut lines)?;

    // Counts come from the file, so nothing is reserved up front: a bogus
    // count runs into the end of the input instead.
    let mut mesh = IndexedMesh::new();
    for (element, count) in &header.elements {
        match element {
            Element::Vertex => {
                for _ in 0..*count {
                    mesh.append_vertex(read_vertex(&mut lines)?);
                }
            }
            Element::Face => {
                for _ in 0..*count {
                    mesh.append_face(read_face(&mut lines, header.face_colors)?);
                }
            }
            Element::Other(name) => {
                debug!(element = name.as_str(), count, "skipping ply element");
                for _ in 0..*count {
                    lines.next_record()?;
                }
            }
        }
    }

    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        colored = header.face_colors,
        "read ply"
    );
    Ok(mesh)
}

fn read_vertex<R: BufRead>(lines: &mut LineReader<R>) -> Result<Point, MeshError> {
    let line = lines.next_record()?;
    let mut tokens = line.split_whitespace();
    let x = parse(lines, &mut tokens, "vertex x")?;
    let y = parse(lines, &mut tokens, "vertex y")?;
    let z = parse(lines, &mut tokens, "vertex z")?;
    Ok(Point::new(x, y, z))
}

fn read_face<R: BufRead>(lines: &mut LineReader<R>, colored: bool) -> Result<Face, MeshError> {
    let line = lines.next_record()?;
    let mut tokens = line.split_whitespace();

    let count: usize = parse(lines, &mut tokens, "face vertex count")?;
    let mut indices = (0..count)
        .map(|_| parse(lines, &mut tokens, "face vertex index"))
        .collect::<Result<Vec<usize>, _>>()?;
    if indices.len() > 3 && indices.first() == indices.last() {
        indices.pop();
    }

    let color = if colored {
        Some([
            parse(lines, &mut tokens, "face red")?,
            parse(lines, &mut tokens, "face green")?,
            parse(lines, &mut tokens, "face blue")?,
        ])
    } else {
        None
    };
    Ok(Face::new(indices, color))
}

fn read_header<R: BufRead>(lines: &mut LineReader<R>) -> Result<Header, MeshError> {
    if lines.next_line()? != "ply" {
        return Err(MeshError::Header("missing 'ply' magic".into()));
    }
    let format = lines.next_line()?;
    if format != "format ascii 1.0" {
        return Err(MeshError::Header(format!("unsupported format '{format}'")));
    }

    let mut header = Header::default();

    loop {
        let line = lines.next_line()?;
        let mut words = line.split_whitespace();

        match words.next() {
            Some("end_header") => break,
            None | Some("comment") | Some("obj_info") => {}
            Some("element") => {
                let name = words.next().unwrap_or_default();
                let count = words
                    .next()
                    .and_then(|c| c.parse().ok())
                    .ok_or_else(|| MeshError::Header(format!("bad element line '{line}'")))?;

                let element = match name {
                    "vertex" => Element::Vertex,
                    "face" => Element::Face,
                    other => Element::Other(other.to_owned()),
                };
                let known = !matches!(element, Element::Other(_));
                if known && header.elements.iter().any(|(seen, _)| *seen == element) {
                    return Err(MeshError::Header(format!("duplicate element '{name}'")));
                }
                header.elements.push((element, count));
            }
            Some("property") => {
                let name = words.last().unwrap_or_default();
                let in_face = matches!(header.elements.last(), Some((Element::Face, _)));
                if in_face && matches!(name, "red" | "green" | "blue") {
                    header.face_colors = true;
                }
            }
            Some(other) => return Err(MeshError::Header(format!("unknown header keyword '{other}'"))),
        }
    }

    if !header.elements.iter().any(|(element, _)| *element == Element::Vertex) {
        return Err(MeshError::Header("no vertex element".into()));
    }
    Ok(header)
}

fn parse<T: FromStr, R: BufRead>(
    lines: &LineReader<R>,
    tokens: &mut SplitWhitespace<'_>,
    what: &str,
) -> Result<T, MeshError> {
    let token = tokens.next().ok_or_else(|| lines.error(format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| lines.error(format!("invalid {what} '{token}'")))
}

/// Writes `mesh` as ASCII PLY.
///
/// Face colours are written when at least one face has a colour; faces
/// without one are then written white.
pub fn write_ply<W: Write>(mesh: &IndexedMesh, mut writer: W) -> Result<(), MeshError> {
    let colored = mesh.faces.iter().any(|f| f.color.is_some());
    let widest = mesh.faces.iter().map(|f| f.indices.len()).max().unwrap_or(0);
    let count_type = if widest > u8::MAX as usize { "uint" } else { "uchar" };

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment written by csg-mesh")?;
    writeln!(writer, "element vertex {}", mesh.vertex_count())?;
    for axis in ["x", "y", "z"] {
        writeln!(writer, "property double {axis}")?;
    }
    if !mesh.faces.is_empty() {
        writeln!(writer, "element face {}", mesh.face_count())?;
        writeln!(writer, "property list {count_type} int vertex_index")?;
        if colored {
            for channel in ["red", "green", "blue"] {
                writeln!(writer, "property uchar {channel}")?;
            }
        }
    }
    writeln!(writer, "end_header")?;

    for v in &mesh.vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }
    for face in &mesh.faces {
        write!(writer, "{}", face.indices.len())?;
        for index in &face.indices {
            write!(writer, " {index}")?;
        }
        if colored {
            let [r, g, b] = face.color.unwrap_or(WHITE);
            write!(writer, " {r} {g} {b}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;

    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        colored,
        "wrote ply"
    );
    Ok(())
}

pub fn read_ply_file(path: impl AsRef<Path>) -> Result<IndexedMesh, MeshError> {
    read_ply(BufReader::new(File::open(path)?))
}

pub fn write_ply_file(mesh: &IndexedMesh, path: impl AsRef<Path>) -> Result<(), MeshError> {
    write_ply(mesh, BufWriter::new(File::create(path)?))
}
