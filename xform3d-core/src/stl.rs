//! STL vertex reader for binary and ASCII files
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{double, le_f32, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::StlError;
use crate::geometry::PointSet;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

type Facet = [Point3<f64>; 3];

/// Read the vertices of a binary STL file, three per facet
pub fn parse_binary_stl(data: &[u8]) -> Result<PointSet, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    let (body, declared) = binary_header(data).map_err(|_| StlError::TooSmall(data.len()))?;
    let declared = declared as usize;
    let found = body.len() / FACET_LEN;
    if found < declared {
        return Err(StlError::Truncated { declared, found });
    }

    let (_, facets) = count(binary_facet, declared)(body).map_err(|_| StlError::Truncated { declared, found })?;
    Ok(collect(facets))
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], Point3<f64>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point3::new(x as f64, y as f64, z as f64)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    // normal, three vertices, attribute byte count
    let (input, _normal) = binary_vector(input)?;
    let (input, (a, b, c)) = tuple((binary_vector, binary_vector, binary_vector))(input)?;
    let (input, _) = take(2usize)(input)?;
    Ok((input, [a, b, c]))
}

/// Read the vertices of an ASCII STL file, three per facet
pub fn parse_ascii_stl(input: &str) -> Result<PointSet, StlError> {
    match ascii_solid(input) {
        Ok((_, facets)) => Ok(collect(facets)),
        Err(e) => Err(StlError::Ascii(e.to_string())),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_vertex(input: &str) -> IResult<&str, Point3<f64>> {
    preceded(preceded(multispace0, tag("vertex")), ascii_vector)(input)
}

fn ascii_vector(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, x) = preceded(multispace0, double)(input)?;
    let (input, y) = preceded(multispace1, double)(input)?;
    let (input, z) = preceded(multispace1, double)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn collect(facets: Vec<Facet>) -> PointSet {
    PointSet::from_points(facets.into_iter().flatten().collect())
}

/// Detect the STL flavour and read its vertices
pub fn parse_stl(data: &[u8]) -> Result<PointSet, StlError> {
    if data.starts_with(b"solid") {
        // binary files may also start with "solid"; fall back if the text does not parse
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(points) = parse_ascii_stl(text) {
                return Ok(points);
            }
        }
    }

    parse_binary_stl(data)
}
