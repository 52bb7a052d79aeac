use crate::ast::{Expr, LiteralValue};

/// Debug renderings of expression trees.
pub struct AstPrinter;

impl AstPrinter {
    /// Fully parenthesised prefix form: `a + b` renders as `(+ a b)`.
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => self.parenthesize(&operator.lexeme, &[left.as_ref(), right.as_ref()]),

            Expr::Unary { operator, right } => self.parenthesize(&operator.lexeme, &[right.as_ref()]),

            Expr::Literal(literal) => match literal {
                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }
                LiteralValue::Str(s) => s.to_string(),
                LiteralValue::True => "true".to_string(),
                LiteralValue::False => "false".to_string(),
                LiteralValue::Nil => "nil".to_string(),
            },

            Expr::Grouping(inner) => self.parenthesize("group", &[inner.as_ref()]),

            Expr::Variable { name, .. } => name.lexeme.to_string(),

            Expr::Assign { name, value, .. } => {
                format!("(= {} {})", name.lexeme, self.print(value))
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut out = format!("(call {}", self.print(callee));
                for argument in arguments {
                    out.push(' ');
                    out.push_str(&self.print(argument));
                }
                out.push(')');
                out
            }

            Expr::Get { object, name } => format!("(. {} {})", self.print(object), name.lexeme),

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(= (. {} {}) {})",
                self.print(object),
                name.lexeme,
                self.print(value)
            ),

            Expr::This { .. } => "this".to_string(),

            Expr::Super { method, .. } => format!("(super {})", method.lexeme),
        }
    }

    /// Fully parenthesised *infix* form in the language's own syntax.  The
    /// output re‑lexes and re‑parses to an expression that evaluates the
    /// same way; only groupings are added.
    pub fn to_source(&self, expr: &Expr) -> String {
        match expr {
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                self.to_source(left),
                operator.lexeme,
                self.to_source(right)
            ),

            Expr::Unary { operator, right } => {
                format!("({}{})", operator.lexeme, self.to_source(right))
            }

            Expr::Literal(literal) => match literal {
                LiteralValue::Number(n) => n.to_string(),
                LiteralValue::Str(s) => format!("\"{}\"", s),
                LiteralValue::True => "true".to_string(),
                LiteralValue::False => "false".to_string(),
                LiteralValue::Nil => "nil".to_string(),
            },

            Expr::Grouping(inner) => format!("({})", self.to_source(inner)),

            Expr::Variable { name, .. } => name.lexeme.to_string(),

            Expr::Assign { name, value, .. } => {
                format!("({} = {})", name.lexeme, self.to_source(value))
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let arguments: Vec<String> = arguments.iter().map(|a| self.to_source(a)).collect();
                format!("{}({})", self.to_source(callee), arguments.join(", "))
            }

            Expr::Get { object, name } => format!("{}.{}", self.to_source(object), name.lexeme),

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "({}.{} = {})",
                self.to_source(object),
                name.lexeme,
                self.to_source(value)
            ),

            Expr::This { .. } => "this".to_string(),

            Expr::Super { method, .. } => format!("super.{}", method.lexeme),
        }
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print(expr));
        }
        out.push(')');
        out
    }
}
