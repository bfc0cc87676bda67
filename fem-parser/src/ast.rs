// Fem AST Definitions
// Abstract Syntax Tree nodes with source spans

use std::fmt;

/// Source position information for tokens and AST nodes (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.start.into(), span.len())
    }
}

/// Top-level program: the statements of one source text
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// Ordered sequence of statements between a block opener and its terminator
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Print(Expression),
    Assignment(Assignment),
    Call(FunctionCall),
    If(IfStatement),
    While(WhileLoop),
    For(ForLoop),
    FunctionDefinition(FunctionDefinition),
    /// `None` for a bare `return`
    Return(Option<Expression>),
    Pass,
    Break,
    Continue,
    Try(TryStatement),
}

/// Names (variables, functions, parameters, properties)
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_block: Block,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub variable: Identifier,
    pub iterable: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub body: Block,
    pub handler: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Variable(Identifier),
    Unary(UnaryOperation),
    Binary(BinaryOperation),
    Comparison(Comparison),
    Logical(LogicalOperation),
    List(Vec<Expression>),
    Dict(Vec<DictEntry>),
    Index(IndexAccess),
    Property(PropertyAccess),
    Call(FunctionCall),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

/// A single comparison; chains nest to the right (`a < b < c` is `a < (b < c)`)
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Box<Expression>,
    pub operator: ComparisonOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalOperation {
    pub left: Box<Expression>,
    pub operator: LogicalOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    pub key: Expression,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexAccess {
    pub target: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAccess {
    pub target: Box<Expression>,
    pub property: Identifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Identifier,
    pub arguments: Vec<Expression>,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// Source reconstruction

const INDENT: &str = "    ";

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write_statement(f, statement, 0)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    for statement in &block.statements {
        write_statement(f, statement, depth)?;
    }
    Ok(())
}

fn write_statement(f: &mut fmt::Formatter<'_>, statement: &Statement, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    match &statement.kind {
        StatementKind::Print(value) => writeln!(f, "{pad}print {value}"),
        StatementKind::Assignment(assignment) => {
            writeln!(f, "{pad}{} = {}", assignment.target.name, assignment.value)
        }
        StatementKind::Call(call) => writeln!(f, "{pad}{call}"),
        StatementKind::If(if_stmt) => {
            writeln!(f, "{pad}if {} then", if_stmt.condition)?;
            write_block(f, &if_stmt.then_block, depth + 1)?;
            if let Some(else_block) = &if_stmt.else_block {
                writeln!(f, "{pad}else")?;
                write_block(f, else_block, depth + 1)?;
            }
            writeln!(f, "{pad}end")
        }
        StatementKind::While(while_loop) => {
            writeln!(f, "{pad}while {} then", while_loop.condition)?;
            write_block(f, &while_loop.body, depth + 1)?;
            writeln!(f, "{pad}end")
        }
        StatementKind::For(for_loop) => {
            writeln!(
                f,
                "{pad}for {} = {} then",
                for_loop.variable.name, for_loop.iterable
            )?;
            write_block(f, &for_loop.body, depth + 1)?;
            writeln!(f, "{pad}end")
        }
        StatementKind::FunctionDefinition(def) => {
            let params: Vec<&str> = def.parameters.iter().map(|p| p.name.as_str()).collect();
            writeln!(f, "{pad}def {}({}) then", def.name.name, params.join(", "))?;
            write_block(f, &def.body, depth + 1)?;
            writeln!(f, "{pad}end")
        }
        StatementKind::Return(Some(value)) => writeln!(f, "{pad}return {value}"),
        StatementKind::Return(None) => writeln!(f, "{pad}return"),
        StatementKind::Pass => writeln!(f, "{pad}pass"),
        StatementKind::Break => writeln!(f, "{pad}break"),
        StatementKind::Continue => writeln!(f, "{pad}continue"),
        StatementKind::Try(try_stmt) => {
            writeln!(f, "{pad}try")?;
            write_block(f, &try_stmt.body, depth + 1)?;
            writeln!(f, "{pad}except")?;
            write_block(f, &try_stmt.handler, depth + 1)?;
            writeln!(f, "{pad}end")
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Integer(value) => write!(f, "{value}"),
            ExpressionKind::Float(value) => {
                if value.fract() == 0.0 && value.is_finite() {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value}")
                }
            }
            ExpressionKind::String(value) => write!(f, "\"{}\"", escape_string(value)),
            ExpressionKind::Boolean(value) => write!(f, "{value}"),
            ExpressionKind::Null => write!(f, "null"),
            ExpressionKind::Variable(id) => write!(f, "{}", id.name),
            ExpressionKind::Unary(op) => match op.operator {
                UnaryOperator::Not => write!(f, "not {}", op.operand),
                UnaryOperator::Negate => write!(f, "-{}", op.operand),
            },
            ExpressionKind::Binary(op) => write!(f, "({} {} {})", op.left, op.operator, op.right),
            ExpressionKind::Comparison(op) => {
                write!(f, "({} {} {})", op.left, op.operator, op.right)
            }
            ExpressionKind::Logical(op) => write!(f, "({} {} {})", op.left, op.operator, op.right),
            ExpressionKind::List(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            ExpressionKind::Dict(entries) => {
                let items: Vec<String> = entries
                    .iter()
                    .map(|entry| format!("{}: {}", entry.key, entry.value))
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            ExpressionKind::Index(access) => write!(f, "{}[{}]", access.target, access.index),
            ExpressionKind::Property(access) => {
                write!(f, "{}.{}", access.target, access.property.name)
            }
            ExpressionKind::Call(call) => write!(f, "{call}"),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.name.name, args.join(", "))
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterEqual => ">=",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("and"),
            LogicalOperator::Or => f.write_str("or"),
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            other => escaped.push(other),
        }
    }
    escaped
}
