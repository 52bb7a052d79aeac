//! Tree‑walking evaluator.
//!
//! Statements execute against a chain of [`Environment`] frames rooted at the
//! global frame.  Variable accesses the resolver proved to be local carry a
//! binding distance in `locals`; everything else is looked up in `globals`.
//!
//! Non‑local exits are plain values: [`execute`](Interpreter::execute)
//! returns [`Flow::Return`] for a `return` and `Err` for a runtime error,
//! and every block or call propagates them outward after restoring the
//! environment it replaced.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::mem;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, LiteralValue, Stmt};
use crate::class::{LoxClass, LoxInstance, INITIALIZER};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::function::{LoxFunction, NativeFunction};
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Deepest nesting of user function calls before a runtime error is raised
/// instead of exhausting the host stack.
pub const MAX_CALL_DEPTH: usize = 1024;

/// How a statement finished.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    /// Binding distances recorded by the resolver.  Entries live as long as
    /// the session, since closures from earlier prompt lines still use them.
    locals: HashMap<ExprId, usize>,
    /// User function calls currently on the stack.
    call_depth: usize,
    out: Box<dyn Write>,
}

impl Interpreter {
    /// Creates an interpreter printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates an interpreter whose `print` statements write to `out`, and
    /// defines the native functions in its global frame.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");

        globals.borrow_mut().define(
            "clock",
            Value::NativeFunction(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: |_args: &[Value]| {
                    let millis: i64 = chrono::Utc::now().timestamp_millis();
                    Ok(Value::Number(millis as f64 / 1000.0))
                },
            })),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            call_depth: 0,
            out,
        }
    }

    /// Record that the variable expression `id` resolves `depth` frames out.
    /// Called by the resolver.
    pub fn note_local(&mut self, id: ExprId, depth: usize) {
        debug!("Noting {:?} at depth {}", id, depth);
        self.locals.insert(id, depth);
    }

    /// Drop the distances of a resolve pass that was rejected; its nodes will
    /// never run.
    pub fn forget_locals(&mut self, ids: &[ExprId]) {
        debug!("Forgetting {} resolved local(s)", ids.len());
        for id in ids {
            self.locals.remove(id);
        }
    }

    /// Number of binding distances currently recorded.
    pub fn resolved_locals(&self) -> usize {
        self.locals.len()
    }

    /// Interprets a list of statements (a "program").  A runtime error
    /// aborts only the top-level statement that raised it; the rest still
    /// run, and every error is handed back to the caller.
    pub fn interpret(&mut self, statements: &[Stmt]) -> std::result::Result<(), Vec<LoxError>> {
        debug!("Interpreting {} statements", statements.len());

        let mut errors: Vec<LoxError> = Vec::new();

        for stmt in statements {
            if let Err(e) = self.execute(stmt) {
                debug!("Top-level statement failed: {}", e);
                errors.push(e);
            }
        }

        if let Err(e) = self.out.flush() {
            errors.push(e.into());
        }

        if errors.is_empty() {
            info!("Interpretation completed successfully");
            Ok(())
        } else {
            info!("Interpretation finished with {} runtime error(s)", errors.len());
            Err(errors)
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────

    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                debug!("Printed value: {}", value);
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let environment = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, environment)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let superclass: Option<Rc<LoxClass>> = match superclass {
                    Some(expr) => Some(self.evaluate_superclass(expr, name)?),
                    None => None,
                };

                self.environment
                    .borrow_mut()
                    .define(&name.lexeme, Value::Nil);

                // Methods of a subclass close over an extra frame holding
                // `super`, so `super.m()` is resolved statically.
                let method_env: Rc<RefCell<Environment>> = match &superclass {
                    Some(superclass) => {
                        let mut env = Environment::with_enclosing(Rc::clone(&self.environment));
                        env.define("super", Value::Class(Rc::clone(superclass)));
                        Rc::new(RefCell::new(env))
                    }
                    None => Rc::clone(&self.environment),
                };

                let table: HashMap<String, Rc<LoxFunction>> = methods
                    .iter()
                    .map(|method| {
                        let function = LoxFunction::new(
                            Rc::clone(method),
                            Rc::clone(&method_env),
                            method.name.lexeme == INITIALIZER,
                        );
                        (method.name.lexeme.clone(), Rc::new(function))
                    })
                    .collect();

                let class = LoxClass::new(name.lexeme.clone(), superclass, table);
                debug!("Defined class {:?}", class);

                self.environment
                    .borrow_mut()
                    .assign(name, Value::Class(Rc::new(class)))?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Execute `statements` in `environment`, restoring the current frame on
    /// every exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Environment) -> Result<Flow> {
        let previous = mem::replace(&mut self.environment, Rc::new(RefCell::new(environment)));

        let result = self.execute_all(statements);

        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn evaluate_superclass(&mut self, expr: &Expr, class_name: &Token) -> Result<Rc<LoxClass>> {
        match self.evaluate(expr)? {
            Value::Class(class) => Ok(class),
            _ => {
                let token = match expr {
                    Expr::Variable { name, .. } => name,
                    _ => class_name,
                };
                Err(LoxError::runtime(token, "Superclass must be a class."))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match operator.token_type {
                    TokenType::MINUS => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(LoxError::runtime(
                            operator,
                            format!("Operand of '{}' must be a number.", operator.lexeme),
                        )),
                    },
                    TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
                    _ => Err(invalid_operator(operator)),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(operator, left, right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let decided = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }
                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;
                let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }
                self.call_value(callee, paren, values)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),
                _ => Err(LoxError::runtime(name, "Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(LoxError::runtime(name, "Only instances have fields."));
                };
                let value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());
                Ok(value)
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    /// `super.m` looks `m` up on the superclass captured when the enclosing
    /// class was declared, and binds it to the current `this`, which lives
    /// one frame inside the `super` frame.
    fn evaluate_super(&self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let distance: usize = *self
            .locals
            .get(&id)
            .ok_or_else(|| LoxError::runtime(keyword, "Unresolved 'super'."))?;

        let Value::Class(superclass) = Environment::get_at(&self.environment, distance, keyword)? else {
            return Err(LoxError::runtime(keyword, "Superclass must be a class."));
        };

        let this = Token::synthetic("this", keyword.line);
        let this_distance: usize = distance
            .checked_sub(1)
            .ok_or_else(|| LoxError::runtime(keyword, "Unresolved 'super'."))?;
        let Value::Instance(object) = Environment::get_at(&self.environment, this_distance, &this)? else {
            return Err(LoxError::runtime(keyword, "Only instances have superclasses."));
        };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(object)))),
            None => Err(LoxError::runtime(
                method,
                format!("Undefined property '{}'.", method.lexeme),
            )),
        }
    }

    /// Invokes a callable (native function, user function or class).
    fn call_value(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> Result<Value> {
        match callee {
            Value::NativeFunction(native) => {
                check_arity(paren, native.arity, arguments.len())?;
                debug!("Calling native function '{}'", native.name);
                (native.func)(&arguments).map_err(|msg| LoxError::runtime(paren, msg))
            }

            Value::Function(function) => {
                check_arity(paren, function.arity(), arguments.len())?;
                self.call_function(&function, paren, arguments)
            }

            Value::Class(class) => {
                check_arity(paren, class.arity(), arguments.len())?;
                debug!("Instantiating class '{}'", class.name);

                let instance = Rc::new(RefCell::new(LoxInstance::new(Rc::clone(&class))));
                if let Some(initializer) = class.find_method(INITIALIZER) {
                    let bound = initializer.bind(Rc::clone(&instance));
                    self.call_function(&bound, paren, arguments)?;
                }
                Ok(Value::Instance(instance))
            }

            other => Err(LoxError::runtime(
                paren,
                format!(
                    "Can only call functions and classes, not {}.",
                    other.type_name()
                ),
            )),
        }
    }

    /// Runs a user function one level deeper, refusing to go past
    /// [`MAX_CALL_DEPTH`].
    fn call_function(
        &mut self,
        function: &LoxFunction,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(LoxError::runtime(paren, "Stack overflow."));
        }

        self.call_depth += 1;
        let result = function.call(self, arguments);
        self.call_depth -= 1;

        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn check_arity(paren: &Token, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(LoxError::runtime(
            paren,
            format!("Expected {} arguments but got {}.", expected, got),
        ))
    }
}

fn invalid_operator(operator: &Token) -> LoxError {
    LoxError::runtime(
        operator,
        format!("Invalid operator '{}'.", operator.lexeme),
    )
}

/// Evaluates a binary operator over already evaluated operands.
fn binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    if let TokenType::PLUS = operator.token_type {
        return match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            _ => Err(LoxError::runtime(
                operator,
                "Operands of '+' must be two numbers or two strings.",
            )),
        };
    }

    match operator.token_type {
        TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left == right)),
        TokenType::BANG_EQUAL => return Ok(Value::Bool(left != right)),
        _ => {}
    }

    let (Value::Number(a), Value::Number(b)) = (&left, &right) else {
        return Err(LoxError::runtime(
            operator,
            format!("Operands of '{}' must be numbers.", operator.lexeme),
        ));
    };
    let (a, b) = (*a, *b);

    match operator.token_type {
        TokenType::MINUS => Ok(Value::Number(a - b)),
        TokenType::STAR => Ok(Value::Number(a * b)),
        TokenType::SLASH => Ok(Value::Number(a / b)),
        TokenType::GREATER => Ok(Value::Bool(a > b)),
        TokenType::GREATER_EQUAL => Ok(Value::Bool(a >= b)),
        TokenType::LESS => Ok(Value::Bool(a < b)),
        TokenType::LESS_EQUAL => Ok(Value::Bool(a <= b)),
        _ => Err(invalid_operator(operator)),
    }
}
