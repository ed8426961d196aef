//! `.mdpa` text reader.
//!
//! Walks `Begin <Section> [name]` ... `End <Section>` blocks. Blank lines and
//! `//` comments are ignored. Top-level sections this crate does not model
//! (e.g. `ModelPartData`, `Table`) are skipped with a warning.

use tracing::{debug, warn};

use crate::error::{MdpaError, Result};
use crate::model::{Condition, Element, Model, ModelBuilder, Node, Properties};
use crate::sub_model::SubModel;

/// Parse `.mdpa` text into a [`Model`].
pub fn from_mdpa(raw: &str) -> Result<Model> {
    let model = MdpaReader::new(raw).read_model()?;
    debug!(
        nodes = model.nodes().len(),
        elements = model.elements().len(),
        conditions = model.conditions().len(),
        sub_models = model.sub_models().len(),
        "parsed mdpa model"
    );
    Ok(model)
}

struct MdpaReader<'a> {
    lines: Vec<(usize, &'a str)>,
    position: usize,
}

impl<'a> MdpaReader<'a> {
    fn new(raw: &'a str) -> Self {
        let lines = raw
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with("//"))
            .collect();
        Self { lines, position: 0 }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.get(self.position).copied();
        if line.is_some() {
            self.position += 1;
        }
        line
    }

    fn read_model(mut self) -> Result<Model> {
        let mut builder = ModelBuilder::new();

        while let Some((number, line)) = self.next_line() {
            let (section, args) = parse_begin(line, number)?;
            match section {
                "Properties" => {
                    let id = parse_block_id(block_name(&args, section, number)?, section, number)?;
                    let values = self.read_properties(number)?;
                    builder.add_property(id, values);
                }
                "Nodes" => {
                    block_name(&args, section, number)?;
                    for (id, node) in self.read_nodes(number)? {
                        builder.add_node(id, node);
                    }
                }
                "Elements" => {
                    let type_name = require_name(block_name(&args, section, number)?, section, number)?;
                    for (id, property_id, node_ids) in self.read_entities(section, number)? {
                        builder.add_element(type_name, id, Element::new(property_id, node_ids));
                    }
                }
                "Conditions" => {
                    let type_name = require_name(block_name(&args, section, number)?, section, number)?;
                    for (id, property_id, node_ids) in self.read_entities(section, number)? {
                        builder.add_condition(type_name, id, Condition::new(property_id, node_ids));
                    }
                }
                "SubModelPart" => {
                    let name = require_name(block_name(&args, section, number)?, section, number)?;
                    let sub_model = self.read_sub_model(number)?;
                    builder.add_sub_model(name, sub_model);
                }
                other => {
                    warn!(section = other, line = number, "skipping unsupported mdpa block");
                    self.read_block(other, number)?;
                }
            }
        }

        Ok(builder.build())
    }

    /// Body lines of a flat block, up to its matching `End <section>`.
    fn read_block(&mut self, section: &str, begin_line: usize) -> Result<Vec<(usize, &'a str)>> {
        let mut body = Vec::new();
        while let Some((number, line)) = self.next_line() {
            if let Some(found) = line.strip_prefix("End") {
                let found = found.trim();
                if found == section {
                    return Ok(body);
                }
                return Err(MdpaError::MismatchedEnd {
                    expected: section.to_string(),
                    found: found.to_string(),
                    line: number,
                });
            }
            body.push((number, line));
        }
        Err(MdpaError::UnterminatedBlock {
            section: section.to_string(),
            line: begin_line,
        })
    }

    fn read_properties(&mut self, begin_line: usize) -> Result<Properties> {
        let mut values = Properties::new();
        for (number, line) in self.read_block("Properties", begin_line)? {
            let mut tokens = line.split_whitespace();
            let (Some(key), Some(value), None) = (tokens.next(), tokens.next(), tokens.next()) else {
                return Err(format_error(number, format!("expected `KEY value`, found `{line}`")));
            };
            values.insert(key.to_string(), parse_number(value, number)?);
        }
        Ok(values)
    }

    fn read_nodes(&mut self, begin_line: usize) -> Result<Vec<(i32, Node)>> {
        let mut nodes = Vec::new();
        for (number, line) in self.read_block("Nodes", begin_line)? {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let [id, x, y, z] = tokens[..] else {
                return Err(format_error(number, format!("expected `id x y z`, found `{line}`")));
            };
            nodes.push((
                parse_number(id, number)?,
                Node::new(
                    parse_number(x, number)?,
                    parse_number(y, number)?,
                    parse_number(z, number)?,
                ),
            ));
        }
        Ok(nodes)
    }

    fn read_entities(&mut self, section: &str, begin_line: usize) -> Result<Vec<(i32, i32, Vec<i32>)>> {
        let mut entities = Vec::new();
        for (number, line) in self.read_block(section, begin_line)? {
            let values = line
                .split_whitespace()
                .map(|token| parse_number::<i32>(token, number))
                .collect::<Result<Vec<i32>>>()?;
            let [id, property_id, ref node_ids @ ..] = values[..] else {
                return Err(format_error(number, format!("expected `id property nodes...`, found `{line}`")));
            };
            entities.push((id, property_id, node_ids.to_vec()));
        }
        Ok(entities)
    }

    fn read_id_list(&mut self, section: &str, begin_line: usize) -> Result<Vec<i32>> {
        self.read_block(section, begin_line)?
            .into_iter()
            .map(|(number, line)| parse_number(line, number))
            .collect()
    }

    fn read_sub_model(&mut self, begin_line: usize) -> Result<SubModel> {
        let mut sub_model = SubModel::new();

        while let Some((number, line)) = self.next_line() {
            if let Some(found) = line.strip_prefix("End") {
                let found = found.trim();
                if found == "SubModelPart" {
                    return Ok(sub_model);
                }
                return Err(MdpaError::MismatchedEnd {
                    expected: "SubModelPart".to_string(),
                    found: found.to_string(),
                    line: number,
                });
            }

            let (section, args) = parse_begin(line, number)?;
            sub_model = match section {
                "SubModelPartProperties" => sub_model.with_properties(self.read_id_list(section, number)?),
                "SubModelPartNodes" => sub_model.with_nodes(self.read_id_list(section, number)?),
                "SubModelPartElements" => sub_model.with_elements(self.read_id_list(section, number)?),
                "SubModelPartConditions" => sub_model.with_conditions(self.read_id_list(section, number)?),
                "SubModelPart" => {
                    let name = require_name(block_name(&args, section, number)?, section, number)?;
                    let nested = self.read_sub_model(number)?;
                    sub_model.with_sub_model(name, nested)
                }
                other => {
                    warn!(section = other, line = number, "skipping unsupported sub-model block");
                    self.read_block(other, number)?;
                    sub_model
                }
            };
        }

        Err(MdpaError::UnterminatedBlock {
            section: "SubModelPart".to_string(),
            line: begin_line,
        })
    }
}

/// Split a `Begin <Section> [args...]` header into the section and its arguments.
fn parse_begin(line: &str, number: usize) -> Result<(&str, Vec<&str>)> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("Begin") {
        return Err(format_error(number, format!("expected `Begin <Section>`, found `{line}`")));
    }
    let Some(section) = tokens.next() else {
        return Err(format_error(number, "block header has no section name".to_string()));
    };
    Ok((section, tokens.collect()))
}

/// The optional single name of a block this reader models.
fn block_name<'a>(args: &[&'a str], section: &str, number: usize) -> Result<Option<&'a str>> {
    match args {
        [] => Ok(None),
        [name] => Ok(Some(*name)),
        [_, extra, ..] => Err(format_error(
            number,
            format!("unexpected `{extra}` in `Begin {section}` header"),
        )),
    }
}

fn require_name<'a>(name: Option<&'a str>, section: &str, number: usize) -> Result<&'a str> {
    name.ok_or_else(|| format_error(number, format!("`Begin {section}` needs a name")))
}

fn parse_block_id(name: Option<&str>, section: &str, number: usize) -> Result<i32> {
    parse_number(require_name(name, section, number)?, number)
}

fn parse_number<T: std::str::FromStr>(token: &str, number: usize) -> Result<T> {
    token
        .parse()
        .map_err(|_| format_error(number, format!("cannot read `{token}` as a number")))
}

fn format_error(line: usize, message: String) -> MdpaError {
    MdpaError::Format { line, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_every_block_kind() {
        let raw = "\
Begin Properties 0
    DENSITY 7850.0
End Properties

Begin Nodes
    1 0.0 0.0 0.0
    2 1000.0 0.0 0.0
End Nodes

// comment
Begin Elements TrussLinearElement3D2N
    1 0 1 2
End Elements

Begin Conditions PointLoadCondition2D1N
    1 0 2
End Conditions

Begin SubModelPart load_1
    Begin SubModelPartNodes
        2
    End SubModelPartNodes

    Begin SubModelPartConditions
        1
    End SubModelPartConditions
End SubModelPart
";
        let model = from_mdpa(raw).expect("model should parse");
        assert_eq!(model.properties()[&0]["DENSITY"], 7850.0);
        assert_eq!(model.nodes()[&2], Node::new(1000.0, 0.0, 0.0));
        let trusses = model.elements().get("TrussLinearElement3D2N").expect("truss block");
        assert_eq!(trusses[&1], Element::new(0, vec![1, 2]));
        let load = model.sub_model("load_1").expect("load sub-model");
        assert_eq!(load.nodes(), &[2]);
        assert_eq!(load.conditions(), &[1]);
    }

    #[test]
    fn written_text_reads_back() {
        let mut builder = ModelBuilder::new();
        builder
            .add_property(0, Properties::new())
            .add_node(1, Node::new(0.5, -1.0, 2.0))
            .add_element("TrussLinearElement3D2N", 1, Element::new(0, vec![1, 1]))
            .add_sub_model(
                "outer",
                SubModel::new()
                    .with_properties(vec![0])
                    .with_sub_model("inner", SubModel::new().with_nodes(vec![1])),
            );
        let model = builder.build();
        assert_eq!(from_mdpa(&model.to_mdpa_string()).expect("reads back"), model);
    }

    #[test]
    fn unterminated_block() {
        let err = from_mdpa("Begin Nodes\n    1 0.0 0.0 0.0\n").expect_err("no End Nodes");
        assert_eq!(
            err,
            MdpaError::UnterminatedBlock {
                section: "Nodes".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn mismatched_end() {
        let err = from_mdpa("Begin Nodes\nEnd Elements\n").expect_err("wrong End");
        assert!(matches!(err, MdpaError::MismatchedEnd { line: 2, .. }));

        let err = from_mdpa("Begin SubModelPart a\nEnd Nodes\n").expect_err("wrong End");
        assert!(matches!(err, MdpaError::MismatchedEnd { .. }));
    }

    #[test]
    fn malformed_rows() {
        assert!(matches!(
            from_mdpa("Begin Nodes\n    1 0.0 0.0\nEnd Nodes\n"),
            Err(MdpaError::Format { line: 2, .. })
        ));
        assert!(matches!(
            from_mdpa("Begin Elements Truss\n    x 0 1 2\nEnd Elements\n"),
            Err(MdpaError::Format { .. })
        ));
        assert!(matches!(from_mdpa("Nodes\n"), Err(MdpaError::Format { line: 1, .. })));
    }

    #[test]
    fn unknown_blocks_are_skipped() {
        let raw = "Begin ModelPartData\n    SOME_VALUE 1\nEnd ModelPartData\nBegin Nodes\n    1 0.0 0.0 0.0\nEnd Nodes\n";
        let model = from_mdpa(raw).expect("model should parse");
        assert_eq!(model.nodes().len(), 1);

        let raw = "\
Begin Table 1 TIME DISPLACEMENT_X
    0.0 0.0
    1.0 0.5
End Table
Begin Nodes
    1 0 0 0
End Nodes
Begin SubModelPart supports
    Begin SubModelPartTables 1 TIME
        1
    End SubModelPartTables
    Begin SubModelPartNodes
        1
    End SubModelPartNodes
End SubModelPart
";
        let model = from_mdpa(raw).expect("table headers carry extra arguments");
        assert_eq!(model.nodes().len(), 1);
        assert_eq!(model.sub_model("supports").expect("sub-model").nodes(), &[1]);
    }

    #[test]
    fn modelled_blocks_take_at_most_one_name() {
        let err = from_mdpa("Begin Elements Truss extra\nEnd Elements\n").expect_err("two names");
        assert!(matches!(err, MdpaError::Format { line: 1, .. }));
    }
}
